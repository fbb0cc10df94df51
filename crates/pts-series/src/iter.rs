//! Forward-only entry cursors over a series or a builder.
//!
//! A cursor starts *before* the first entry.  Each `next_*` call advances
//! it by one and makes that entry "current"; the `current_*` accessors fail
//! until the first advance.  Only the builder cursor supports
//! [`remove`](EntryIterator::remove), after which the current accessors
//! fail again until the next advance.

use chrono::DateTime;
use pts_core::errors::{Error, Result};
use pts_core::{fail, Key, Real};
use pts_time::{decode, Zone};

use crate::builder::TimeSeriesBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    NotStarted,
    At(usize),
    // The entry at this index was removed; its successor now occupies it.
    Removed(usize),
}

#[derive(Debug, Clone, Copy)]
struct Cursor {
    position: Position,
}

impl Cursor {
    fn new() -> Self {
        Self {
            position: Position::NotStarted,
        }
    }

    fn next_index(&self) -> usize {
        match self.position {
            Position::NotStarted => 0,
            Position::At(i) => i + 1,
            Position::Removed(i) => i,
        }
    }

    fn has_next(&self, len: usize) -> bool {
        self.next_index() < len
    }

    fn advance(&mut self, len: usize) -> Result<usize> {
        let next = self.next_index();
        if next >= len {
            return Err(Error::NoMoreElements);
        }
        self.position = Position::At(next);
        Ok(next)
    }

    fn current(&self) -> Result<usize> {
        match self.position {
            Position::At(i) => Ok(i),
            Position::NotStarted => fail!("iterator not started: advance before reading"),
            Position::Removed(_) => fail!("current entry has been removed"),
        }
    }

    fn remove(&mut self) -> Result<usize> {
        let index = self.current()?;
        self.position = Position::Removed(index);
        Ok(index)
    }
}

/// Stateful cursor over `(key, value)` entries in ascending key order.
///
/// The `*_key` methods are the primitive accessors; the `*_time` methods
/// decode the key in the cursor's zone.
pub trait EntryIterator {
    /// Whether another entry follows the current one.
    fn has_next(&self) -> bool;

    /// Advance and return the new current key.
    ///
    /// # Errors
    /// [`Error::NoMoreElements`] when [`has_next`](Self::has_next) is false.
    fn next_key(&mut self) -> Result<Key>;

    /// Index of the current entry.
    fn current_index(&self) -> Result<usize>;

    /// Key of the current entry.
    fn current_key(&self) -> Result<Key>;

    /// Value of the current entry.
    fn current_value(&self) -> Result<Real>;

    /// Zone used to decode keys.
    fn zone(&self) -> Zone;

    /// Advance and return the new current instant.
    fn next_time(&mut self) -> Result<DateTime<Zone>> {
        let key = self.next_key()?;
        Ok(decode(key, self.zone()))
    }

    /// Advance and return the new current `(instant, value)` entry.
    fn next_entry(&mut self) -> Result<(DateTime<Zone>, Real)> {
        let time = self.next_time()?;
        Ok((time, self.current_value()?))
    }

    /// Advance and return the new current `(key, value)` entry.
    fn next_entry_fast(&mut self) -> Result<(Key, Real)> {
        let key = self.next_key()?;
        Ok((key, self.current_value()?))
    }

    /// Instant of the current entry.
    fn current_time(&self) -> Result<DateTime<Zone>> {
        Ok(decode(self.current_key()?, self.zone()))
    }

    /// Remove the current entry from the underlying collection.
    ///
    /// # Errors
    /// [`Error::Unsupported`] for read-only cursors.
    fn remove(&mut self) -> Result<()> {
        Err(Error::Unsupported(
            "entries cannot be removed through a read-only iterator".into(),
        ))
    }
}

/// Read-only cursor over a [`TimeSeries`](crate::TimeSeries).
///
/// Also a standard [`Iterator`] over `(key, value)` pairs.
#[derive(Debug, Clone)]
pub struct SeriesIter<'a> {
    keys: &'a [Key],
    values: &'a [Real],
    zone: Zone,
    cursor: Cursor,
}

impl<'a> SeriesIter<'a> {
    pub(crate) fn new(keys: &'a [Key], values: &'a [Real], zone: Zone) -> Self {
        Self {
            keys,
            values,
            zone,
            cursor: Cursor::new(),
        }
    }
}

impl EntryIterator for SeriesIter<'_> {
    fn has_next(&self) -> bool {
        self.cursor.has_next(self.keys.len())
    }

    fn next_key(&mut self) -> Result<Key> {
        let i = self.cursor.advance(self.keys.len())?;
        Ok(self.keys[i])
    }

    fn current_index(&self) -> Result<usize> {
        self.cursor.current()
    }

    fn current_key(&self) -> Result<Key> {
        Ok(self.keys[self.cursor.current()?])
    }

    fn current_value(&self) -> Result<Real> {
        Ok(self.values[self.cursor.current()?])
    }

    fn zone(&self) -> Zone {
        self.zone
    }
}

impl Iterator for SeriesIter<'_> {
    type Item = (Key, Real);

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.cursor.advance(self.keys.len()).ok()?;
        Some((self.keys[i], self.values[i]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.keys.len() - self.cursor.next_index();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SeriesIter<'_> {}

/// Cursor over a [`TimeSeriesBuilder`] that can remove entries.
#[derive(Debug)]
pub struct BuilderIter<'a> {
    builder: &'a mut TimeSeriesBuilder,
    cursor: Cursor,
}

impl<'a> BuilderIter<'a> {
    pub(crate) fn new(builder: &'a mut TimeSeriesBuilder) -> Self {
        Self {
            builder,
            cursor: Cursor::new(),
        }
    }
}

impl EntryIterator for BuilderIter<'_> {
    fn has_next(&self) -> bool {
        self.cursor.has_next(self.builder.len())
    }

    fn next_key(&mut self) -> Result<Key> {
        let i = self.cursor.advance(self.builder.len())?;
        Ok(self.builder.keys()[i])
    }

    fn current_index(&self) -> Result<usize> {
        self.cursor.current()
    }

    fn current_key(&self) -> Result<Key> {
        Ok(self.builder.keys()[self.cursor.current()?])
    }

    fn current_value(&self) -> Result<Real> {
        Ok(self.builder.values()[self.cursor.current()?])
    }

    fn zone(&self) -> Zone {
        self.builder.zone()
    }

    fn remove(&mut self) -> Result<()> {
        let index = self.cursor.remove()?;
        self.builder.remove_at(index);
        Ok(())
    }
}

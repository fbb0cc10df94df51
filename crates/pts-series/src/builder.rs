//! Mutable staging area for a [`TimeSeries`].
//!
//! The builder keeps two parallel buffers whose physical length is the
//! capacity, plus a logical `size`.  The prefix `[0, size)` is always
//! strictly ascending: `put` overwrites an existing key in place and
//! shifts the tail right to insert a new one.  Growth is geometric
//! (doubling, never by fewer than eight slots).
//!
//! Instants passed to the `put_*` methods are encoded with the builder's
//! [`InstantCodec`] (the default one unless set with
//! [`with_codec`](TimeSeriesBuilder::with_codec)); built series inherit it.
//!
//! A builder is single-owner: mutation takes `&mut self`, so sharing one
//! across threads requires external synchronization.

use std::borrow::Borrow;
use std::fmt;

use chrono::{DateTime, TimeZone};
use pts_core::errors::{Error, Result};
use pts_core::{ensure, Key, Real};
use pts_time::{InstantCodec, Settings, Zone};
use tracing::trace;

use crate::iter::BuilderIter;
use crate::series::TimeSeries;

const MIN_GROWTH: usize = 8;

/// Resizable, insertion-sorted builder for [`TimeSeries`].
///
/// ```
/// use pts_series::TimeSeriesBuilder;
///
/// let mut builder = TimeSeriesBuilder::new(chrono_tz::UTC);
/// builder.put(30, 3.0).put(10, 1.0).put(20, 2.0).put(10, 1.5);
/// let series = builder.build();
/// assert_eq!(series.keys(), &[10, 20, 30]);
/// assert_eq!(series.values(), &[1.5, 2.0, 3.0]);
/// ```
#[derive(Clone)]
pub struct TimeSeriesBuilder {
    keys: Vec<Key>,
    values: Vec<Real>,
    size: usize,
    zone: Zone,
    codec: InstantCodec,
}

impl TimeSeriesBuilder {
    /// Create an empty builder whose series will carry `zone`.
    pub fn new(zone: Zone) -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
            size: 0,
            zone,
            codec: InstantCodec::default(),
        }
    }

    /// Create an empty builder with room for `capacity` entries.
    pub fn with_capacity(zone: Zone, capacity: usize) -> Self {
        Self {
            keys: vec![0; capacity],
            values: vec![0.0; capacity],
            size: 0,
            zone,
            codec: InstantCodec::default(),
        }
    }

    /// Encode instants with `codec` instead of the default one.
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use pts_series::TimeSeriesBuilder;
    /// use pts_time::{InstantCodec, MAX_KEY};
    ///
    /// let codec = InstantCodec::with_year_bounds(1900, 2200)?;
    /// let mut builder = TimeSeriesBuilder::new(chrono_tz::UTC).with_codec(codec);
    /// builder.put_instant(&Utc.with_ymd_and_hms(2200, 1, 1, 0, 0, 0).unwrap(), 1.0)?;
    /// assert_eq!(builder.keys(), &[MAX_KEY]);
    /// # Ok::<(), pts_core::Error>(())
    /// ```
    pub fn with_codec(mut self, codec: InstantCodec) -> Self {
        self.codec = codec;
        self
    }

    // ── Inspectors ───────────────────────────────────────────────────────

    /// Number of distinct keys held.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Whether the builder holds no entries.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of entries that fit without growing.
    pub fn capacity(&self) -> usize {
        self.keys.len()
    }

    /// Zone attached to built series.
    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// Codec used for instant arguments.
    pub fn codec(&self) -> InstantCodec {
        self.codec
    }

    /// Keys held, ascending.
    pub fn keys(&self) -> &[Key] {
        &self.keys[..self.size]
    }

    /// Values held, in key order.
    pub fn values(&self) -> &[Real] {
        &self.values[..self.size]
    }

    // ── Mutators ─────────────────────────────────────────────────────────

    /// Insert `value` at `key`, overwriting any existing value.
    pub fn put(&mut self, key: Key, value: Real) -> &mut Self {
        match self.keys().binary_search(&key) {
            Ok(i) => self.values[i] = value,
            Err(i) => {
                self.reserve(1);
                let size = self.size;
                self.keys.copy_within(i..size, i + 1);
                self.values.copy_within(i..size, i + 1);
                self.keys[i] = key;
                self.values[i] = value;
                self.size += 1;
            }
        }
        self
    }

    /// Encode `instant` and insert `value` at its key.
    ///
    /// # Errors
    /// Propagates [`Error::OutOfRange`] from the codec.
    pub fn put_instant<Tz: TimeZone>(
        &mut self,
        instant: &DateTime<Tz>,
        value: Real,
    ) -> Result<&mut Self> {
        let key = self.codec.encode(instant)?;
        Ok(self.put(key, value))
    }

    /// Insert every `(keys[i], values[i])` pair; later duplicates win.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if the slices differ in length.  Nothing
    /// is inserted in that case.
    pub fn put_all(&mut self, keys: &[Key], values: &[Real]) -> Result<&mut Self> {
        ensure!(
            keys.len() == values.len(),
            "keys and values must have the same length, got {} and {}",
            keys.len(),
            values.len()
        );
        self.reserve(keys.len());
        for (&k, &v) in keys.iter().zip(values) {
            self.put(k, v);
        }
        Ok(self)
    }

    /// Encode and insert every `(instants[i], values[i])` pair.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] on mismatched lengths, or the codec's
    /// error for the first unencodable instant.  Nothing is inserted on
    /// error.
    pub fn put_all_instants<Tz: TimeZone>(
        &mut self,
        instants: &[DateTime<Tz>],
        values: &[Real],
    ) -> Result<&mut Self> {
        ensure!(
            instants.len() == values.len(),
            "instants and values must have the same length, got {} and {}",
            instants.len(),
            values.len()
        );
        let keys = self.codec.encode_all(instants)?;
        self.put_all(&keys, values)
    }

    /// Insert every entry of `series`.
    pub fn put_all_series(&mut self, series: &TimeSeries) -> &mut Self {
        self.put_sorted(series.keys(), series.values())
    }

    /// Insert the entries of `series` at positions `[start, end)`.
    ///
    /// # Errors
    /// [`Error::SliceOutOfRange`] if either bound exceeds `series.len()`,
    /// [`Error::InvertedSlice`] if `start > end`.
    pub fn put_all_series_range(
        &mut self,
        series: &TimeSeries,
        start: usize,
        end: usize,
    ) -> Result<&mut Self> {
        let size = series.len();
        if start > size {
            return Err(Error::SliceOutOfRange {
                bound: "start",
                index: start,
                size,
            });
        }
        if end > size {
            return Err(Error::SliceOutOfRange {
                bound: "end",
                index: end,
                size,
            });
        }
        if start > end {
            return Err(Error::InvertedSlice { start, end });
        }
        Ok(self.put_sorted(&series.keys()[start..end], &series.values()[start..end]))
    }

    /// Insert every `(instant, value)` entry of a map or other collection.
    ///
    /// Accepts both owned and borrowed entries, so `&HashMap` and
    /// `&BTreeMap` work directly.
    ///
    /// # Errors
    /// The codec's error for the first unencodable instant; nothing is
    /// inserted in that case.
    pub fn put_all_map<I, K, V, Tz>(&mut self, entries: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Borrow<DateTime<Tz>>,
        V: Borrow<Real>,
        Tz: TimeZone,
    {
        let codec = self.codec;
        let encoded = entries
            .into_iter()
            .map(|(k, v)| {
                let instant: &DateTime<Tz> = k.borrow();
                let value: &Real = v.borrow();
                Ok((codec.encode(instant)?, *value))
            })
            .collect::<Result<Vec<_>>>()?;
        self.reserve(encoded.len());
        for (k, v) in encoded {
            self.put(k, v);
        }
        Ok(self)
    }

    /// Remove every entry, keeping the allocated capacity.
    pub fn clear(&mut self) -> &mut Self {
        self.size = 0;
        self
    }

    /// Cursor over the entries that can remove the current one.
    pub fn iter_mut(&mut self) -> BuilderIter<'_> {
        BuilderIter::new(self)
    }

    /// Freeze the current contents into a new series.
    ///
    /// The builder is left untouched and may keep being used.
    pub fn build(&self) -> TimeSeries {
        trace!(size = self.size, capacity = self.capacity(), "building time series");
        TimeSeries::from_parts(self.keys(), self.values(), self.zone, self.codec)
    }

    // ── Internals ────────────────────────────────────────────────────────

    pub(crate) fn remove_at(&mut self, index: usize) {
        let size = self.size;
        self.keys.copy_within(index + 1..size, index);
        self.values.copy_within(index + 1..size, index);
        self.size -= 1;
    }

    /// Bulk insert of strictly ascending keys, appending when possible.
    fn put_sorted(&mut self, keys: &[Key], values: &[Real]) -> &mut Self {
        debug_assert!(keys.windows(2).all(|w| w[0] < w[1]));
        let appendable = match (self.keys().last(), keys.first()) {
            (Some(last), Some(first)) => last < first,
            _ => true,
        };
        if appendable {
            self.reserve(keys.len());
            let (start, end) = (self.size, self.size + keys.len());
            self.keys[start..end].copy_from_slice(keys);
            self.values[start..end].copy_from_slice(values);
            self.size = end;
        } else {
            self.reserve(keys.len());
            for (&k, &v) in keys.iter().zip(values) {
                self.put(k, v);
            }
        }
        self
    }

    fn reserve(&mut self, additional: usize) {
        let required = self.size + additional;
        let capacity = self.capacity();
        if required <= capacity {
            return;
        }
        let new_capacity = required.max(capacity * 2).max(capacity + MIN_GROWTH);
        trace!(capacity, new_capacity, "growing time series builder");
        self.keys.resize(new_capacity, 0);
        self.values.resize(new_capacity, 0.0);
    }
}

impl Default for TimeSeriesBuilder {
    /// Empty builder in the default zone from [`Settings`].
    fn default() -> Self {
        Self::new(Settings::instance().default_zone())
    }
}

impl Extend<(Key, Real)> for TimeSeriesBuilder {
    fn extend<I: IntoIterator<Item = (Key, Real)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl FromIterator<(Key, Real)> for TimeSeriesBuilder {
    fn from_iter<I: IntoIterator<Item = (Key, Real)>>(iter: I) -> Self {
        let mut builder = Self::default();
        builder.extend(iter);
        builder
    }
}

impl fmt::Debug for TimeSeriesBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeSeriesBuilder")
            .field("keys", &self.keys())
            .field("values", &self.values())
            .field("zone", &self.zone)
            .field("codec", &self.codec)
            .finish()
    }
}

impl fmt::Display for TimeSeriesBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builder[size={}]", self.size)
    }
}

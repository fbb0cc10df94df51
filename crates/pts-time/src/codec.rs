//! Reversible mapping between a calendar instant and a sortable `i64` key.
//!
//! A key is the number of nanoseconds between the Unix epoch and the
//! instant.  Instants whose UTC year reaches the codec's configured bounds
//! collapse onto one of two sentinels:
//!
//! | Instant | Key |
//! |---------|-----|
//! | year `>= max_year` | [`MAX_KEY`] (`i64::MAX`) |
//! | year `<= min_year` | [`MIN_KEY`] (`i64::MIN`) |
//! | otherwise | `seconds * 1e9 + nanos`, overflow-checked |
//!
//! Decoding a sentinel yields the extreme instant the date library can
//! represent.  The zone is not part of the key and must be supplied on
//! decode.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use pts_core::errors::{Error, Result};
use pts_core::{ensure, Key};
use tracing::debug;

/// Zone attached to decoded instants and to series.
pub type Zone = chrono_tz::Tz;

/// Far-future sentinel key.
pub const MAX_KEY: Key = i64::MAX;

/// Far-past sentinel key.
pub const MIN_KEY: Key = i64::MIN;

const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// Return `true` if `key` is one of the two sentinels.
pub fn is_sentinel(key: Key) -> bool {
    key == MAX_KEY || key == MIN_KEY
}

/// Instant ⇄ key codec with configurable sentinel bounds.
///
/// The default codec clamps only at the limits of the calendar itself, so
/// every instant between roughly 1677 and 2262 round-trips exactly and
/// everything outside that window but inside the calendar is rejected as
/// out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstantCodec {
    min_year: i32,
    max_year: i32,
}

impl Default for InstantCodec {
    fn default() -> Self {
        Self {
            min_year: NaiveDate::MIN.year(),
            max_year: NaiveDate::MAX.year(),
        }
    }
}

impl InstantCodec {
    /// Create a codec that clamps years `<= min_year` to [`MIN_KEY`] and
    /// years `>= max_year` to [`MAX_KEY`].
    ///
    /// The free [`encode`] function always uses the default codec; builders
    /// and series take a configured one through their `with_codec` methods.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] unless `min_year < max_year`.
    pub fn with_year_bounds(min_year: i32, max_year: i32) -> Result<Self> {
        ensure!(
            min_year < max_year,
            "sentinel year bounds must satisfy min < max, got [{min_year}, {max_year}]"
        );
        Ok(Self { min_year, max_year })
    }

    /// Highest year that encodes to [`MIN_KEY`].
    pub fn min_year(&self) -> i32 {
        self.min_year
    }

    /// Lowest year that encodes to [`MAX_KEY`].
    pub fn max_year(&self) -> i32 {
        self.max_year
    }

    /// Encode an instant.
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] when the instant is inside the sentinel
    /// bounds but its nanosecond count does not fit in an `i64`.
    pub fn encode<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> Result<Key> {
        let utc = instant.naive_utc();
        let year = utc.year();
        if year >= self.max_year {
            debug!(year, max_year = self.max_year, "clamping instant to far-future key");
            return Ok(MAX_KEY);
        }
        if year <= self.min_year {
            debug!(year, min_year = self.min_year, "clamping instant to far-past key");
            return Ok(MIN_KEY);
        }
        let utc = utc.and_utc();
        let nanos = i128::from(utc.timestamp()) * NANOS_PER_SECOND
            + i128::from(utc.timestamp_subsec_nanos());
        Key::try_from(nanos).map_err(|_| {
            Error::OutOfRange(format!(
                "{} is more than {} ns from the epoch",
                utc.to_rfc3339(),
                Key::MAX
            ))
        })
    }

    /// Encode every instant in `instants`, failing on the first error.
    pub fn encode_all<Tz: TimeZone>(&self, instants: &[DateTime<Tz>]) -> Result<Vec<Key>> {
        instants.iter().map(|i| self.encode(i)).collect()
    }

    /// Decode a key into an instant viewed in `zone`.
    ///
    /// Sentinels decode to the library's extreme UTC instants.
    pub fn decode(&self, key: Key, zone: Zone) -> DateTime<Zone> {
        let utc = match key {
            MAX_KEY => DateTime::<Utc>::MAX_UTC,
            MIN_KEY => DateTime::<Utc>::MIN_UTC,
            nanos => DateTime::from_timestamp_nanos(nanos),
        };
        utc.with_timezone(&zone)
    }
}

/// Encode with the default codec.
pub fn encode<Tz: TimeZone>(instant: &DateTime<Tz>) -> Result<Key> {
    InstantCodec::default().encode(instant)
}

/// Decode with the default codec.
pub fn decode(key: Key, zone: Zone) -> DateTime<Zone> {
    InstantCodec::default().decode(key, zone)
}

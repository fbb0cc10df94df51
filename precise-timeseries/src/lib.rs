//! # precise-timeseries
//!
//! Immutable numeric time series keyed by nanosecond-precision instants.
//!
//! This crate is a **façade** that re-exports all public items from the
//! underlying workspace crates. Application code should depend on this
//! crate rather than the individual `pts-*` crates.
//!
//! ## Quick start
//!
//! ```toml
//! [dependencies]
//! precise-timeseries = "0.1"
//! ```
//!
//! ```rust
//! use chrono::TimeZone;
//! use precise_timeseries::{TimeSeries, Zone};
//!
//! let zone: Zone = chrono_tz::Europe::London;
//! let mut fixings = TimeSeries::builder(zone);
//! fixings.put_instant(&zone.with_ymd_and_hms(2024, 1, 2, 11, 0, 0).unwrap(), 5.25)?;
//! fixings.put_instant(&zone.with_ymd_and_hms(2024, 1, 3, 11, 0, 0).unwrap(), 5.20)?;
//! let fixings = fixings.build();
//!
//! let spread = fixings.add_scalar(0.10);
//! assert_eq!(spread.len(), 2);
//! assert_eq!(spread.earliest_time()?, zone.with_ymd_and_hms(2024, 1, 2, 11, 0, 0).unwrap());
//! # Ok::<(), precise_timeseries::core::Error>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core aliases and error definitions.
pub use pts_core as core;

/// Instant codec and zone settings.
pub use pts_time as time;

/// Series, builder, cursors, and operators.
pub use pts_series as series;

pub use pts_series::{
    BinaryOperator, BuilderIter, EntryIterator, SeriesIter, TimeSeries, TimeSeriesBuilder,
    UnaryOperator,
};
pub use pts_time::{InstantCodec, Settings, Zone};

//! # pts-series
//!
//! Immutable numeric time series keyed by encoded instants, a mutable
//! builder for assembling them, forward cursors over both, and the
//! linear-merge operator engine.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// `TimeSeriesBuilder`: sorted insertion with overwrite.
pub mod builder;

/// `EntryIterator` cursors over series and builders.
pub mod iter;

/// Intersection and union merge kernels.
pub mod merge;

/// Predefined unary and binary value operators.
pub mod operators;

/// `TimeSeries`: the immutable series and its operations.
pub mod series;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use builder::TimeSeriesBuilder;
pub use iter::{BuilderIter, EntryIterator, SeriesIter};
pub use operators::{BinaryOperator, UnaryOperator};
pub use series::TimeSeries;

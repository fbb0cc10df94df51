//! Error types for precise-timeseries.
//!
//! Every failure in the codec, series, builder, and iterator layers is a
//! variant of the single `thiserror`-derived [`Error`] enum.  The
//! [`ensure!`](crate::ensure) and [`fail!`](crate::fail) macros cover the
//! two most common early returns.

use thiserror::Error;

/// The top-level error type used throughout precise-timeseries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Missing or malformed argument (mismatched lengths, unsorted keys,
    /// inverted interval bounds).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An instant cannot be encoded without overflowing the key range.
    #[error("instant out of representable range: {0}")]
    OutOfRange(String),

    /// Positional access past the end of a series.
    #[error("index ({index}) out of range [0, {size})")]
    IndexOutOfRange {
        /// The index that was out of range.
        index: usize,
        /// The size of the container.
        size: usize,
    },

    /// One bound of a slice lies outside `[0, size]`.
    #[error("{bound} index ({index}) out of range [0, {size}]")]
    SliceOutOfRange {
        /// Which bound was violated (`"start"` or `"end"`).
        bound: &'static str,
        /// The offending index.
        index: usize,
        /// The size of the sliced container.
        size: usize,
    },

    /// Slice start lies after slice end.
    #[error("start index ({start}) is after end index ({end})")]
    InvertedSlice {
        /// Requested start position.
        start: usize,
        /// Requested end position.
        end: usize,
    },

    /// The operation needs at least one entry.
    #[error("empty series: {0}")]
    EmptySeries(&'static str),

    /// The operation is not legal in the current state.
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// An iterator was advanced past its last entry.
    #[error("no more elements")]
    NoMoreElements,

    /// The operation is not supported by this type.
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

/// Shorthand `Result` type used throughout precise-timeseries.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::InvalidArgument(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use pts_core::{ensure, errors::Error};
/// fn positive(x: f64) -> pts_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(matches!(positive(-1.0), Err(Error::InvalidArgument(_))));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::InvalidArgument(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::IllegalState(...))` immediately.
///
/// # Example
/// ```
/// use pts_core::{fail, errors::Error};
/// fn always_err() -> pts_core::errors::Result<()> {
///     fail!("cursor is {}", "exhausted");
/// }
/// assert_eq!(
///     always_err(),
///     Err(Error::IllegalState("cursor is exhausted".into()))
/// );
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::IllegalState(format!($($msg)*)))
    };
}

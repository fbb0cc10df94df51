//! # pts-core
//!
//! Core types and error definitions for precise-timeseries.
//!
//! This crate provides the building blocks shared by the codec and series
//! crates: primitive type aliases, the error enum, and the `ensure!` /
//! `fail!` macros.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Error types and the `ensure!` / `fail!` macros.
pub mod errors;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type stored as a series value.
pub type Real = f64;

/// Encoded instant: nanoseconds from the epoch, or a sentinel.
pub type Key = i64;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{Error, Result};

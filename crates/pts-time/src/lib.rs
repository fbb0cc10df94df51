//! # pts-time
//!
//! Encoding of calendar instants into sortable 64-bit keys, and the
//! process-wide zone settings.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// `InstantCodec`: instant ⇄ key conversion with sentinel clamping.
pub mod codec;

/// Global settings (default zone).
pub mod settings;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use codec::{decode, encode, is_sentinel, InstantCodec, Zone, MAX_KEY, MIN_KEY};
pub use settings::{ScopedDefaultZone, Settings};

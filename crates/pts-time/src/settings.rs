//! Default zone for series and builders that are not given one.
//!
//! A key carries no zone, so anything that decodes keys needs one from
//! somewhere.  `TimeSeries::default()`, `TimeSeriesBuilder::default()`,
//! the `FromIterator` impls, and `TimeSeries::from_instants` with no zone
//! and no instants all ask [`Settings`] for it.  The zone starts as UTC.
//!
//! Changing it affects every thread.  Tests and scoped overrides should
//! hold a [`ScopedDefaultZone`] rather than calling
//! [`Settings::set_default_zone`] directly.

use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use crate::codec::Zone;

/// Holder of the default zone.
pub struct Settings {
    default_zone: Mutex<Zone>,
}

static INSTANCE: OnceLock<Settings> = OnceLock::new();

impl Settings {
    /// The shared instance, created with UTC on first use.
    pub fn instance() -> &'static Settings {
        INSTANCE.get_or_init(|| Settings {
            default_zone: Mutex::new(Zone::UTC),
        })
    }

    /// Zone given to series and builders created without one.
    pub fn default_zone(&self) -> Zone {
        *self.zone_slot()
    }

    /// Replace the default zone.  Existing series keep their own zone.
    pub fn set_default_zone(&self, zone: Zone) {
        *self.zone_slot() = zone;
    }

    /// Go back to UTC.
    pub fn reset_default_zone(&self) {
        self.set_default_zone(Zone::UTC);
    }

    // Poisoning is ignored: the slot only ever holds a whole `Copy` value.
    fn zone_slot(&self) -> MutexGuard<'_, Zone> {
        self.default_zone
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Sets the default zone for the lifetime of the guard.
///
/// ```
/// use pts_time::{ScopedDefaultZone, Settings};
///
/// {
///     let _guard = ScopedDefaultZone::new(chrono_tz::Europe::Paris);
///     assert_eq!(Settings::instance().default_zone(), chrono_tz::Europe::Paris);
/// }
/// assert_eq!(Settings::instance().default_zone(), chrono_tz::UTC);
/// ```
#[must_use = "the previous zone is restored as soon as the guard is dropped"]
pub struct ScopedDefaultZone {
    previous: Zone,
}

impl ScopedDefaultZone {
    /// Install `zone` as the default, remembering the current one.
    pub fn new(zone: Zone) -> Self {
        let settings = Settings::instance();
        let previous = settings.default_zone();
        settings.set_default_zone(zone);
        Self { previous }
    }
}

impl Drop for ScopedDefaultZone {
    fn drop(&mut self) {
        Settings::instance().set_default_zone(self.previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test: the singleton is shared by every test in this binary.
    #[test]
    fn default_zone_lifecycle() {
        let settings = Settings::instance();
        assert_eq!(settings.default_zone(), Zone::UTC);

        {
            let _outer = ScopedDefaultZone::new(chrono_tz::Asia::Tokyo);
            assert_eq!(settings.default_zone(), chrono_tz::Asia::Tokyo);
            {
                let _inner = ScopedDefaultZone::new(chrono_tz::America::Chicago);
                assert_eq!(settings.default_zone(), chrono_tz::America::Chicago);
            }
            assert_eq!(settings.default_zone(), chrono_tz::Asia::Tokyo);
        }
        assert_eq!(settings.default_zone(), Zone::UTC);

        settings.set_default_zone(chrono_tz::Europe::Berlin);
        assert_eq!(settings.default_zone(), chrono_tz::Europe::Berlin);
        settings.reset_default_zone();
        assert_eq!(settings.default_zone(), Zone::UTC);

        // A panic while the slot is held leaves the zone readable.
        let poisoned = std::thread::spawn(|| {
            let _slot = Settings::instance().zone_slot();
            panic!("panic while holding the default zone");
        })
        .join();
        assert!(poisoned.is_err());
        settings.set_default_zone(chrono_tz::Asia::Kolkata);
        assert_eq!(settings.default_zone(), chrono_tz::Asia::Kolkata);
        settings.reset_default_zone();
    }
}

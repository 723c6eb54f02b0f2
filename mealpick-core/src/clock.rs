//! Time sources for decision timestamps and recency scoring.
//!
//! Engine components never read the wall clock directly; they take a
//! [`Clock`] so tests can pin "now" to a known instant.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};

/// Source of the current instant.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use mealpick_core::{Clock, FixedClock};
///
/// let instant = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
/// let clock = FixedClock::new(instant);
/// assert_eq!(clock.now(), instant);
/// ```
pub trait Clock: Send + Sync {
    /// Return the current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time via [`Utc::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    /// Freeze the clock at `instant`.
    #[must_use]
    pub const fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A clock that only moves when told to.
///
/// Useful when a scenario needs several decisions at distinct instants.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Start the clock at `instant`.
    #[must_use]
    pub const fn new(instant: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(instant),
        }
    }

    /// Jump to `instant`.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = instant;
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Whole days elapsed between `earlier` and `now`, never negative.
///
/// Instants in the future count as zero days.
///
/// # Examples
/// ```
/// use chrono::{TimeDelta, TimeZone, Utc};
/// use mealpick_core::whole_days_between;
///
/// let now = Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap();
/// let eaten = now - TimeDelta::hours(47);
/// assert_eq!(whole_days_between(eaten, now), 1);
/// ```
#[must_use]
pub fn whole_days_between(earlier: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let days = now.signed_duration_since(earlier).num_days().max(0);
    u32::try_from(days).unwrap_or(u32::MAX)
}

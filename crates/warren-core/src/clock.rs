//! The clock collaborator.
//!
//! All accrual math is a pure function of `(now - last_update)`, so the
//! services never read the ambient clock directly. They hold a [`Clock`]
//! and thread its `now()` through the logic, which keeps every time-based
//! behavior drivable from tests via [`FixedClock`].

use std::sync::RwLock;

use chrono::{DateTime, TimeDelta, Utc};

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    /// Return the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// The production clock: reads the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A settable clock for tests.
///
/// Starts at a caller-provided instant and only moves when told to.
/// A poisoned inner lock (a panicking test thread) falls back to the
/// poisoned value; time never goes backwards because of it.
#[derive(Debug)]
pub struct FixedClock {
    instant: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    /// Create a clock pinned at `start`.
    pub const fn new(start: DateTime<Utc>) -> Self {
        Self {
            instant: RwLock::new(start),
        }
    }

    /// Move the clock to an absolute instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        match self.instant.write() {
            Ok(mut guard) => *guard = instant,
            Err(mut poisoned) => **poisoned.get_mut() = instant,
        }
    }

    /// Advance the clock by a delta.
    pub fn advance(&self, delta: TimeDelta) {
        let next = self.now().checked_add_signed(delta).unwrap_or_else(|| self.now());
        self.set(next);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        match self.instant.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_stays_put() {
        let start = Utc::now();
        let clock = FixedClock::new(start);
        assert_eq!(clock.now(), start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn fixed_clock_advances_on_demand() {
        let start = Utc::now();
        let clock = FixedClock::new(start);
        clock.advance(TimeDelta::minutes(30));
        assert_eq!(clock.now(), start + TimeDelta::minutes(30));
    }

    #[test]
    fn fixed_clock_set_is_absolute() {
        let start = Utc::now();
        let clock = FixedClock::new(start);
        let later = start + TimeDelta::hours(2);
        clock.set(later);
        assert_eq!(clock.now(), later);
    }

    #[test]
    fn system_clock_is_monotonic_enough() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}

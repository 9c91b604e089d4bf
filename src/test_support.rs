//! Test utilities shared by the unit and integration suites.
//!
//! Compiled into the library so integration tests can drive the injected
//! clock; nothing here is intended for production callers.

use std::sync::Mutex;

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

/// Clock test double whose current time can be advanced mid-test.
///
/// Services and domain constructors take [`mockable::Clock`], so a test
/// starts this clock at a fixture instant, runs the operation under test,
/// and advances time between steps to exercise duration arithmetic.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Creates a clock frozen at the given instant.
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Moves the clock forward by the given number of seconds.
    ///
    /// # Panics
    ///
    /// Panics when the clock mutex is poisoned.
    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

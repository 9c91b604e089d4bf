//! Validated visit duration scalar.

use super::VisitDomainError;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whole-minute visit duration, never below one minute.
///
/// Durations are derived from wall-clock elapsed time when a visit ends;
/// sub-minute visits round up to the one-minute floor so a logged visit
/// never reports zero time on site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurationMinutes(i64);

impl DurationMinutes {
    /// Smallest recordable duration.
    pub const MIN: Self = Self(1);

    /// Creates a validated duration from a persisted minute count.
    ///
    /// # Errors
    ///
    /// Returns [`VisitDomainError::InvalidDuration`] when the value is below
    /// one minute.
    pub const fn new(minutes: i64) -> Result<Self, VisitDomainError> {
        if minutes < 1 {
            return Err(VisitDomainError::InvalidDuration(minutes));
        }
        Ok(Self(minutes))
    }

    /// Derives a duration from elapsed session time.
    ///
    /// Rounds to the nearest whole minute (half up) and floors the result at
    /// one minute, so a 125-second visit records 2 minutes and anything under
    /// a minute records 1. Negative elapsed time (clock skew) also clamps to
    /// the floor.
    #[must_use]
    pub fn from_elapsed(elapsed: TimeDelta) -> Self {
        let rounded = (elapsed + TimeDelta::seconds(30)).num_minutes();
        Self(rounded.max(1))
    }

    /// Returns the duration as whole minutes.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for DurationMinutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min", self.0)
    }
}

//! Weekly route assignments and their schedule scalar.

use super::{AssignmentId, RouteDomainError};
use crate::directory::domain::{AssigneeId, CustomerId, UserId};
use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO day-of-week a route assignment recurs on (1 = Monday, 7 = Sunday).
///
/// The original schema stored the day as an unchecked integer column;
/// values outside the ISO range made assignments silently unreachable by
/// the plan expansion. Construction validates the range once so expansion
/// can trust every stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduledDay(u8);

impl ScheduledDay {
    /// Creates a scheduled day from an ISO day number.
    ///
    /// # Errors
    ///
    /// Returns [`RouteDomainError::InvalidScheduledDay`] when the value is
    /// outside 1..=7.
    pub const fn new(value: u8) -> Result<Self, RouteDomainError> {
        if value == 0 || value > 7 {
            return Err(RouteDomainError::InvalidScheduledDay(value));
        }
        Ok(Self(value))
    }

    /// Creates a scheduled day from a chrono weekday.
    #[must_use]
    pub const fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Self(1),
            Weekday::Tue => Self(2),
            Weekday::Wed => Self(3),
            Weekday::Thu => Self(4),
            Weekday::Fri => Self(5),
            Weekday::Sat => Self(6),
            Weekday::Sun => Self(7),
        }
    }

    /// Returns the ISO day number.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns the equivalent chrono weekday.
    #[must_use]
    pub const fn weekday(self) -> Weekday {
        match self.0 {
            1 => Weekday::Mon,
            2 => Weekday::Tue,
            3 => Weekday::Wed,
            4 => Weekday::Thu,
            5 => Weekday::Fri,
            6 => Weekday::Sat,
            _ => Weekday::Sun,
        }
    }

    /// Returns whether the given calendar date falls on this day.
    #[must_use]
    pub fn matches(self, date: NaiveDate) -> bool {
        date.weekday() == self.weekday()
    }
}

impl fmt::Display for ScheduledDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.weekday())
    }
}

/// Weekly recurring stop on an assignee's route.
///
/// Assignments are immutable once created: route changes delete the old
/// slot and create a new one, so reports over past windows keep their
/// meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteAssignment {
    id: AssignmentId,
    assignee_id: AssigneeId,
    customer_id: CustomerId,
    day: ScheduledDay,
    created_by: UserId,
    created_at: DateTime<Utc>,
}

/// Parameter object for creating a new route assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssignmentData {
    /// Assignee who walks the route.
    pub assignee_id: AssigneeId,
    /// Customer visited on the scheduled day.
    pub customer_id: CustomerId,
    /// ISO weekday the stop recurs on.
    pub day: ScheduledDay,
    /// User who created the assignment.
    pub created_by: UserId,
}

/// Parameter object for reconstructing a persisted route assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAssignmentData {
    /// Persisted assignment identifier.
    pub id: AssignmentId,
    /// Persisted assignee reference.
    pub assignee_id: AssigneeId,
    /// Persisted customer reference.
    pub customer_id: CustomerId,
    /// Persisted scheduled day.
    pub day: ScheduledDay,
    /// Persisted creator reference.
    pub created_by: UserId,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl RouteAssignment {
    /// Creates a new route assignment with a fresh identifier.
    #[must_use]
    pub fn new(data: NewAssignmentData, clock: &impl Clock) -> Self {
        Self {
            id: AssignmentId::new(),
            assignee_id: data.assignee_id,
            customer_id: data.customer_id,
            day: data.day,
            created_by: data.created_by,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a route assignment from persisted storage.
    #[must_use]
    pub const fn from_persisted(data: PersistedAssignmentData) -> Self {
        Self {
            id: data.id,
            assignee_id: data.assignee_id,
            customer_id: data.customer_id,
            day: data.day,
            created_by: data.created_by,
            created_at: data.created_at,
        }
    }

    /// Returns the assignment identifier.
    #[must_use]
    pub const fn id(&self) -> AssignmentId {
        self.id
    }

    /// Returns the assignee who walks the route.
    #[must_use]
    pub const fn assignee_id(&self) -> AssigneeId {
        self.assignee_id
    }

    /// Returns the customer visited on the scheduled day.
    #[must_use]
    pub const fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Returns the ISO weekday the stop recurs on.
    #[must_use]
    pub const fn day(&self) -> ScheduledDay {
        self.day
    }

    /// Returns the user who created the assignment.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

//! Shared test fixtures and module wiring for route unit tests.

use chrono::NaiveDate;
use mockable::DefaultClock;

use crate::directory::domain::{AssigneeId, CustomerId, UserId};
use crate::route::domain::{NewAssignmentData, RouteAssignment, ScheduledDay};

pub(super) use crate::test_support::MutableClock;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

pub(super) fn assignment_on(
    assignee_id: AssigneeId,
    customer_id: CustomerId,
    day: u8,
) -> RouteAssignment {
    RouteAssignment::new(
        NewAssignmentData {
            assignee_id,
            customer_id,
            day: ScheduledDay::new(day).expect("valid scheduled day"),
            created_by: UserId::new(),
        },
        &DefaultClock,
    )
}

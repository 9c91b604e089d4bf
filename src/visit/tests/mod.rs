//! Shared test fixtures and module wiring for visit unit tests.

use chrono::{DateTime, TimeZone, Utc};

pub(super) use crate::test_support::MutableClock;

pub(super) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 5, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

mod saga_tests;
mod service_tests;

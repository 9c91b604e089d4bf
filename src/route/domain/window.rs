//! Inclusive calendar windows for plan expansion.

use super::RouteDomainError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive date range a route plan is reconciled over.
///
/// A window whose start lies after its end is valid and simply empty; the
/// original backend treated that case as "no rows" rather than an error,
/// and reports depend on it when a caller swaps the bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl PlanWindow {
    /// Creates a window over the inclusive `[start, end]` range.
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Creates the one-day window used by the daily plan.
    #[must_use]
    pub const fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Parses a window from `YYYY-MM-DD` bounds, failing fast on malformed
    /// input.
    ///
    /// # Errors
    ///
    /// Returns [`RouteDomainError::InvalidDate`] when either bound does not
    /// parse as a calendar date.
    pub fn parse(start: &str, end: &str) -> Result<Self, RouteDomainError> {
        Ok(Self {
            start: parse_date(start)?,
            end: parse_date(end)?,
        })
    }

    /// Returns the first date of the window.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Returns the last date of the window.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns whether the window contains no dates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Returns the number of calendar dates in the window.
    #[must_use]
    pub fn len_days(&self) -> i64 {
        if self.is_empty() {
            return 0;
        }
        self.end.signed_duration_since(self.start).num_days() + 1
    }

    /// Iterates the calendar dates of the window in ascending order.
    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |date| *date <= end)
    }

    /// Rejects windows spanning more days than the given horizon.
    ///
    /// Day-by-day expansion is linear in the window length, so an
    /// unbounded span would let a single request fan out without limit.
    ///
    /// # Errors
    ///
    /// Returns [`RouteDomainError::WindowTooLarge`] when the span exceeds
    /// `max_days`.
    pub fn check_horizon(&self, max_days: i64) -> Result<(), RouteDomainError> {
        let days = self.len_days();
        if days > max_days {
            return Err(RouteDomainError::WindowTooLarge { days, max_days });
        }
        Ok(())
    }
}

impl fmt::Display for PlanWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, RouteDomainError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|err| RouteDomainError::InvalidDate {
        value: value.to_owned(),
        message: err.to_string(),
    })
}

//! Reconciled stop rows, filters, and pagination for route reports.

use crate::directory::domain::{
    AssigneeId, AssigneeSummary, CustomerGroupId, CustomerId, CustomerSummary, DistrictId,
};
use crate::visit::domain::{DurationMinutes, VisitId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Report status of one planned stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopStatus {
    /// A visit record exists and the store was visited.
    Completed,
    /// A visit record exists but the store could not be visited.
    NoVisit,
    /// No visit record has been logged for the planned day.
    Pending,
}

impl StopStatus {
    /// Returns the report label for the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::NoVisit => "no_visit",
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for StopStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of one planned stop after joining logged visits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StopOutcome {
    /// Nothing has been logged for the planned day.
    Pending,
    /// The stop was visited.
    #[serde(rename = "completed")]
    Visited {
        /// Stored record backing the row.
        visit_id: VisitId,
        /// Instant the visit took place.
        visit_datetime: DateTime<Utc>,
        /// Recorded time on site, when the visit was ended.
        duration: Option<DurationMinutes>,
    },
    /// The assignee reached the stop but could not visit it.
    NoVisit {
        /// Stored record backing the row.
        visit_id: VisitId,
        /// Instant the outcome was logged.
        visit_datetime: DateTime<Utc>,
        /// Display label of the catalogue reason.
        reason_label: String,
        /// Free-text elaboration of the reason, if any.
        description: Option<String>,
    },
}

impl StopOutcome {
    /// Returns the report status for the outcome.
    #[must_use]
    pub const fn status(&self) -> StopStatus {
        match self {
            Self::Pending => StopStatus::Pending,
            Self::Visited { .. } => StopStatus::Completed,
            Self::NoVisit { .. } => StopStatus::NoVisit,
        }
    }

    /// Returns whether a visit record exists for the planned day.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns whether the stop was actually visited.
    #[must_use]
    pub const fn is_visit(&self) -> bool {
        matches!(self, Self::Visited { .. })
    }

    /// Returns the stored record backing the row, when one exists.
    #[must_use]
    pub const fn visit_id(&self) -> Option<VisitId> {
        match self {
            Self::Pending => None,
            Self::Visited { visit_id, .. } | Self::NoVisit { visit_id, .. } => Some(*visit_id),
        }
    }

    /// Returns the recorded duration for visited stops.
    #[must_use]
    pub const fn duration(&self) -> Option<DurationMinutes> {
        match self {
            Self::Visited { duration, .. } => *duration,
            Self::Pending | Self::NoVisit { .. } => None,
        }
    }

    /// Returns the no-visit reason label, when the stop was skipped.
    #[must_use]
    pub fn reason_label(&self) -> Option<&str> {
        match self {
            Self::NoVisit { reason_label, .. } => Some(reason_label),
            Self::Pending | Self::Visited { .. } => None,
        }
    }
}

/// Status subset a report row set is narrowed to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// Keep every row.
    #[default]
    All,
    /// Keep only visited stops.
    Completed,
    /// Keep only stops with a logged no-visit outcome.
    NoVisit,
    /// Keep only stops with nothing logged.
    Pending,
}

impl StatusFilter {
    /// Returns the canonical query representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::NoVisit => "no_visit",
            Self::Pending => "pending",
        }
    }

    /// Returns whether a row with the given status passes the filter.
    #[must_use]
    pub const fn matches(self, status: StopStatus) -> bool {
        match self {
            Self::All => true,
            Self::Completed => matches!(status, StopStatus::Completed),
            Self::NoVisit => matches!(status, StopStatus::NoVisit),
            Self::Pending => matches!(status, StopStatus::Pending),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for StatusFilter {
    type Error = ParseStatusFilterError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "all" => Ok(Self::All),
            "completed" => Ok(Self::Completed),
            "no_visit" => Ok(Self::NoVisit),
            "pending" => Ok(Self::Pending),
            _ => Err(ParseStatusFilterError(value.to_owned())),
        }
    }
}

/// Error returned while parsing status filters from query input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown status filter: {0}")]
pub struct ParseStatusFilterError(pub String);

/// Row filters for reconciliation reports.
///
/// Unset filters pass every row; set filters combine with AND.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StopFilters {
    assignee: Option<AssigneeId>,
    customer: Option<CustomerId>,
    district: Option<DistrictId>,
    customer_group: Option<CustomerGroupId>,
    status: StatusFilter,
}

impl StopFilters {
    /// Creates a filter set that passes every row.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            assignee: None,
            customer: None,
            district: None,
            customer_group: None,
            status: StatusFilter::All,
        }
    }

    /// Narrows the report to one assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: AssigneeId) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Narrows the report to one customer.
    #[must_use]
    pub const fn with_customer(mut self, customer: CustomerId) -> Self {
        self.customer = Some(customer);
        self
    }

    /// Narrows the report to customers in one district.
    #[must_use]
    pub const fn with_district(mut self, district: DistrictId) -> Self {
        self.district = Some(district);
        self
    }

    /// Narrows the report to customers in one reporting group.
    #[must_use]
    pub const fn with_customer_group(mut self, group: CustomerGroupId) -> Self {
        self.customer_group = Some(group);
        self
    }

    /// Narrows the report to one stop status.
    #[must_use]
    pub const fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    /// Returns the assignee filter, if set.
    #[must_use]
    pub const fn assignee(&self) -> Option<AssigneeId> {
        self.assignee
    }

    /// Returns the customer filter, if set.
    #[must_use]
    pub const fn customer(&self) -> Option<CustomerId> {
        self.customer
    }

    /// Returns the district filter, if set.
    #[must_use]
    pub const fn district(&self) -> Option<DistrictId> {
        self.district
    }

    /// Returns the customer group filter, if set.
    #[must_use]
    pub const fn customer_group(&self) -> Option<CustomerGroupId> {
        self.customer_group
    }

    /// Returns the status filter.
    #[must_use]
    pub const fn status(&self) -> StatusFilter {
        self.status
    }

    /// Returns whether a stop at the given customer passes the district and
    /// group filters.
    #[must_use]
    pub fn matches_customer(&self, customer: &CustomerSummary) -> bool {
        let district_ok = self
            .district
            .is_none_or(|want| customer.district.as_ref().is_some_and(|d| d.id == want));
        let group_ok = self
            .customer_group
            .is_none_or(|want| customer.group == Some(want));
        district_ok && group_ok
    }
}

/// Offset pagination applied after the row set is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    limit: usize,
    offset: usize,
}

impl PageRequest {
    /// Creates a page of the given size starting at the first row.
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self { limit, offset: 0 }
    }

    /// Skips the given number of rows before the page starts.
    #[must_use]
    pub const fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Returns the page size.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the number of rows skipped before the page.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }
}

/// One planned stop joined with its logged outcome and display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledStop {
    /// Calendar date the stop was planned for.
    pub plan_date: NaiveDate,

    /// Assignee who was scheduled to make the stop.
    pub assignee: AssigneeSummary,

    /// Customer the stop was planned at.
    pub customer: CustomerSummary,

    /// Joined outcome for the planned day.
    pub outcome: StopOutcome,
}

impl ReconciledStop {
    /// Returns the report status of the row.
    #[must_use]
    pub const fn status(&self) -> StopStatus {
        self.outcome.status()
    }

    /// Returns whether a visit record exists for the row.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.outcome.is_completed()
    }

    /// Returns whether the stop was actually visited.
    #[must_use]
    pub const fn is_visit(&self) -> bool {
        self.outcome.is_visit()
    }
}

/// One page of a reconciliation report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopPage {
    /// Rows of the requested page, in report order.
    pub stops: Vec<ReconciledStop>,

    /// Rows in the whole filtered set, independent of pagination.
    pub total: u64,
}

impl StopPage {
    /// Creates the empty page.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            stops: Vec::new(),
            total: 0,
        }
    }
}

//! Repository port for visit record persistence and window queries.

use crate::directory::domain::{AssigneeId, CustomerId};
use crate::visit::domain::{VisitId, VisitRecord};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;

/// Result type for visit repository operations.
pub type VisitRepositoryResult<T> = Result<T, VisitRepositoryError>;

/// Date-bounded query over stored visit records.
///
/// Comparison is against the record's UTC calendar date, matching the
/// reconciliation join key. Unset identifier filters match every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowQuery {
    /// First calendar date included.
    pub from: NaiveDate,
    /// Last calendar date included.
    pub to: NaiveDate,
    /// Restrict to one assignee, when set.
    pub assignee_id: Option<AssigneeId>,
    /// Restrict to one customer, when set.
    pub customer_id: Option<CustomerId>,
}

impl WindowQuery {
    /// Creates an unfiltered query over the inclusive date range.
    #[must_use]
    pub const fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from,
            to,
            assignee_id: None,
            customer_id: None,
        }
    }

    /// Restricts the query to one assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee_id: AssigneeId) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    /// Restricts the query to one customer.
    #[must_use]
    pub const fn with_customer(mut self, customer_id: CustomerId) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    /// Returns whether a record's attributes fall inside this query.
    #[must_use]
    pub fn matches(&self, record: &VisitRecord) -> bool {
        let date = record.visit_date();
        date >= self.from
            && date <= self.to
            && self
                .assignee_id
                .is_none_or(|assignee| assignee == record.assignee_id())
            && self
                .customer_id
                .is_none_or(|customer| customer == record.customer_id())
    }
}

/// Visit record persistence contract.
///
/// The core never deletes visit records; the contract offers no removal.
#[async_trait]
pub trait VisitRecordRepository: Send + Sync {
    /// Stores a new visit record.
    ///
    /// # Errors
    ///
    /// Returns [`VisitRepositoryError::DuplicateVisit`] when the record ID
    /// already exists, or [`VisitRepositoryError::DuplicateDailyVisit`] when
    /// a record already occupies the `(assignee, customer, visit date)` slot.
    async fn store(&self, record: &VisitRecord) -> VisitRepositoryResult<()>;

    /// Persists changes to an existing visit record (outcome edits, photos,
    /// duration write-back).
    ///
    /// # Errors
    ///
    /// Returns [`VisitRepositoryError::NotFound`] when the record does not
    /// exist.
    async fn update(&self, record: &VisitRecord) -> VisitRepositoryResult<()>;

    /// Finds a visit record by identifier.
    ///
    /// Returns `None` when the record does not exist.
    async fn find_by_id(&self, id: VisitId) -> VisitRepositoryResult<Option<VisitRecord>>;

    /// Finds the at-most-one record in the `(assignee, customer, date)` slot.
    async fn find_daily(
        &self,
        assignee_id: AssigneeId,
        customer_id: CustomerId,
        date: NaiveDate,
    ) -> VisitRepositoryResult<Option<VisitRecord>>;

    /// Returns every record whose visit date falls inside the query window.
    async fn find_in_window(&self, query: WindowQuery) -> VisitRepositoryResult<Vec<VisitRecord>>;
}

/// Errors returned by visit repository implementations.
#[derive(Debug, Clone, Error)]
pub enum VisitRepositoryError {
    /// A record with the same identifier already exists.
    #[error("duplicate visit identifier: {0}")]
    DuplicateVisit(VisitId),

    /// A record already occupies the daily slot.
    #[error("a visit for assignee {assignee_id} at customer {customer_id} on {date} already exists")]
    DuplicateDailyVisit {
        /// Assignee of the occupied slot.
        assignee_id: AssigneeId,
        /// Customer of the occupied slot.
        customer_id: CustomerId,
        /// Calendar date of the occupied slot.
        date: NaiveDate,
    },

    /// The record was not found.
    #[error("visit record not found: {0}")]
    NotFound(VisitId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl VisitRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

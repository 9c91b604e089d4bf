//! Repository port for route assignment persistence.

use crate::directory::domain::{AssigneeId, CustomerId};
use crate::route::domain::{AssignmentId, RouteAssignment, ScheduledDay};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for route repository operations.
pub type RouteRepositoryResult<T> = Result<T, RouteRepositoryError>;

/// Attribute query over stored route assignments.
///
/// Unset filters match every assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssignmentQuery {
    /// Restrict to one assignee, when set.
    pub assignee_id: Option<AssigneeId>,
    /// Restrict to one customer, when set.
    pub customer_id: Option<CustomerId>,
    /// Restrict to one scheduled day, when set.
    pub day: Option<ScheduledDay>,
}

impl AssignmentQuery {
    /// Creates a query matching every assignment.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            assignee_id: None,
            customer_id: None,
            day: None,
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

    /// Restricts the query to one scheduled day.
    #[must_use]
    pub const fn with_day(mut self, day: ScheduledDay) -> Self {
        self.day = Some(day);
        self
    }

    /// Returns whether an assignment's attributes fall inside this query.
    #[must_use]
    pub fn matches(&self, assignment: &RouteAssignment) -> bool {
        self.assignee_id
            .is_none_or(|assignee| assignee == assignment.assignee_id())
            && self
                .customer_id
                .is_none_or(|customer| customer == assignment.customer_id())
            && self.day.is_none_or(|day| day == assignment.day())
    }
}

/// Route assignment persistence contract.
///
/// Assignments are immutable: the contract offers store, delete, and
/// reads, but no update.
#[async_trait]
pub trait RouteAssignmentRepository: Send + Sync {
    /// Stores a new route assignment.
    ///
    /// # Errors
    ///
    /// Returns [`RouteRepositoryError::DuplicateAssignment`] when an
    /// assignment already occupies the `(assignee, customer, day)` slot.
    async fn store(&self, assignment: &RouteAssignment) -> RouteRepositoryResult<()>;

    /// Deletes a route assignment.
    ///
    /// # Errors
    ///
    /// Returns [`RouteRepositoryError::NotFound`] when the assignment does
    /// not exist.
    async fn delete(&self, id: AssignmentId) -> RouteRepositoryResult<()>;

    /// Finds a route assignment by identifier.
    ///
    /// Returns `None` when the assignment does not exist.
    async fn find_by_id(&self, id: AssignmentId) -> RouteRepositoryResult<Option<RouteAssignment>>;

    /// Returns every assignment matching the query.
    async fn list(&self, query: AssignmentQuery) -> RouteRepositoryResult<Vec<RouteAssignment>>;
}

/// Errors returned by route repository implementations.
#[derive(Debug, Clone, Error)]
pub enum RouteRepositoryError {
    /// An assignment already occupies the weekly slot.
    #[error(
        "assignee {assignee_id} already has an assignment at customer {customer_id} on {day}"
    )]
    DuplicateAssignment {
        /// Assignee of the occupied slot.
        assignee_id: AssigneeId,
        /// Customer of the occupied slot.
        customer_id: CustomerId,
        /// Scheduled day of the occupied slot.
        day: ScheduledDay,
    },

    /// The assignment was not found.
    #[error("route assignment not found: {0}")]
    NotFound(AssignmentId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RouteRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

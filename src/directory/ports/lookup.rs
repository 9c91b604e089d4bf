//! Lookup port for batch reference-data reads.

use crate::directory::domain::{
    AssigneeId, AssigneeSummary, CustomerId, CustomerSummary, NoVisitReasonId,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Result type for directory lookup operations.
pub type DirectoryResult<T> = Result<T, DirectoryLookupError>;

/// Batch read contract for customer, assignee, and catalogue labels.
///
/// Identifiers absent from the backing store are simply absent from the
/// returned maps; callers decide how to render the gap. Inactive customers
/// are returned like any other (filtering on active status is the caller's
/// concern).
#[async_trait]
pub trait DirectoryLookup: Send + Sync {
    /// Resolves display summaries for the given customers.
    async fn customer_summaries(
        &self,
        ids: &[CustomerId],
    ) -> DirectoryResult<HashMap<CustomerId, CustomerSummary>>;

    /// Resolves display summaries for the given assignees.
    async fn assignee_summaries(
        &self,
        ids: &[AssigneeId],
    ) -> DirectoryResult<HashMap<AssigneeId, AssigneeSummary>>;

    /// Resolves display labels for the given no-visit reasons.
    async fn no_visit_reason_labels(
        &self,
        ids: &[NoVisitReasonId],
    ) -> DirectoryResult<HashMap<NoVisitReasonId, String>>;
}

/// Errors returned by directory lookup implementations.
#[derive(Debug, Clone, Error)]
pub enum DirectoryLookupError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DirectoryLookupError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

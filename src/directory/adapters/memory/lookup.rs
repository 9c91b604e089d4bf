//! In-memory directory for tests and callers that hold reference data.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::directory::{
    domain::{AssigneeId, AssigneeSummary, CustomerId, CustomerSummary, NoVisitReasonId},
    ports::{DirectoryLookup, DirectoryLookupError, DirectoryResult},
};

/// Thread-safe in-memory directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    state: Arc<RwLock<InMemoryDirectoryState>>,
}

#[derive(Debug, Default)]
struct InMemoryDirectoryState {
    customers: HashMap<CustomerId, CustomerSummary>,
    assignees: HashMap<AssigneeId, AssigneeSummary>,
    reasons: HashMap<NoVisitReasonId, String>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds or replaces a customer summary.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryLookupError::Persistence`] when the backing lock
    /// is poisoned.
    pub fn upsert_customer(&self, summary: CustomerSummary) -> DirectoryResult<()> {
        let mut state = self.write_state()?;
        state.customers.insert(summary.id, summary);
        Ok(())
    }

    /// Seeds or replaces an assignee summary.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryLookupError::Persistence`] when the backing lock
    /// is poisoned.
    pub fn upsert_assignee(&self, summary: AssigneeSummary) -> DirectoryResult<()> {
        let mut state = self.write_state()?;
        state.assignees.insert(summary.id, summary);
        Ok(())
    }

    /// Seeds or replaces a no-visit reason label.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryLookupError::Persistence`] when the backing lock
    /// is poisoned.
    pub fn upsert_no_visit_reason(
        &self,
        id: NoVisitReasonId,
        label: impl Into<String>,
    ) -> DirectoryResult<()> {
        let mut state = self.write_state()?;
        state.reasons.insert(id, label.into());
        Ok(())
    }

    fn write_state(&self) -> DirectoryResult<std::sync::RwLockWriteGuard<'_, InMemoryDirectoryState>> {
        self.state.write().map_err(|err| {
            DirectoryLookupError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn read_state(&self) -> DirectoryResult<std::sync::RwLockReadGuard<'_, InMemoryDirectoryState>> {
        self.state.read().map_err(|err| {
            DirectoryLookupError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

fn collect_present<K, V>(index: &HashMap<K, V>, ids: &[K]) -> HashMap<K, V>
where
    K: std::hash::Hash + Eq + Copy,
    V: Clone,
{
    ids.iter()
        .filter_map(|id| index.get(id).map(|value| (*id, value.clone())))
        .collect()
}

#[async_trait]
impl DirectoryLookup for InMemoryDirectory {
    async fn customer_summaries(
        &self,
        ids: &[CustomerId],
    ) -> DirectoryResult<HashMap<CustomerId, CustomerSummary>> {
        let state = self.read_state()?;
        Ok(collect_present(&state.customers, ids))
    }

    async fn assignee_summaries(
        &self,
        ids: &[AssigneeId],
    ) -> DirectoryResult<HashMap<AssigneeId, AssigneeSummary>> {
        let state = self.read_state()?;
        Ok(collect_present(&state.assignees, ids))
    }

    async fn no_visit_reason_labels(
        &self,
        ids: &[NoVisitReasonId],
    ) -> DirectoryResult<HashMap<NoVisitReasonId, String>> {
        let state = self.read_state()?;
        Ok(collect_present(&state.reasons, ids))
    }
}

//! In-memory repository for visit capture tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::directory::domain::{AssigneeId, CustomerId};
use crate::visit::{
    domain::{VisitId, VisitRecord},
    ports::{VisitRecordRepository, VisitRepositoryError, VisitRepositoryResult, WindowQuery},
};

type DailySlot = (AssigneeId, CustomerId, NaiveDate);

/// Thread-safe in-memory visit record repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVisitRepository {
    state: Arc<RwLock<InMemoryVisitState>>,
}

#[derive(Debug, Default)]
struct InMemoryVisitState {
    records: HashMap<VisitId, VisitRecord>,
    daily_index: HashMap<DailySlot, VisitId>,
}

impl InMemoryVisitRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn daily_slot(record: &VisitRecord) -> DailySlot {
    (
        record.assignee_id(),
        record.customer_id(),
        record.visit_date(),
    )
}

fn poisoned(err: impl std::fmt::Display) -> VisitRepositoryError {
    VisitRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl VisitRecordRepository for InMemoryVisitRepository {
    async fn store(&self, record: &VisitRecord) -> VisitRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.records.contains_key(&record.id()) {
            return Err(VisitRepositoryError::DuplicateVisit(record.id()));
        }

        let slot = daily_slot(record);
        if state.daily_index.contains_key(&slot) {
            let (assignee_id, customer_id, date) = slot;
            return Err(VisitRepositoryError::DuplicateDailyVisit {
                assignee_id,
                customer_id,
                date,
            });
        }

        state.daily_index.insert(slot, record.id());
        state.records.insert(record.id(), record.clone());
        Ok(())
    }

    async fn update(&self, record: &VisitRecord) -> VisitRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;

        let old_record = state
            .records
            .get(&record.id())
            .ok_or(VisitRepositoryError::NotFound(record.id()))?
            .clone();

        // Keep the daily index keyed by the record's current slot.
        state.daily_index.remove(&daily_slot(&old_record));
        state.daily_index.insert(daily_slot(record), record.id());
        state.records.insert(record.id(), record.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: VisitId) -> VisitRepositoryResult<Option<VisitRecord>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.records.get(&id).cloned())
    }

    async fn find_daily(
        &self,
        assignee_id: AssigneeId,
        customer_id: CustomerId,
        date: NaiveDate,
    ) -> VisitRepositoryResult<Option<VisitRecord>> {
        let state = self.state.read().map_err(poisoned)?;
        let record = state
            .daily_index
            .get(&(assignee_id, customer_id, date))
            .and_then(|id| state.records.get(id))
            .cloned();
        Ok(record)
    }

    async fn find_in_window(&self, query: WindowQuery) -> VisitRepositoryResult<Vec<VisitRecord>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .records
            .values()
            .filter(|record| query.matches(record))
            .cloned()
            .collect())
    }
}

//! In-memory repository for route assignment tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::directory::domain::{AssigneeId, CustomerId};
use crate::route::{
    domain::{AssignmentId, RouteAssignment, ScheduledDay},
    ports::{
        AssignmentQuery, RouteAssignmentRepository, RouteRepositoryError, RouteRepositoryResult,
    },
};

type WeeklySlot = (AssigneeId, CustomerId, ScheduledDay);

/// Thread-safe in-memory route assignment repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRouteAssignmentRepository {
    state: Arc<RwLock<InMemoryAssignmentState>>,
}

#[derive(Debug, Default)]
struct InMemoryAssignmentState {
    assignments: HashMap<AssignmentId, RouteAssignment>,
    slot_index: HashMap<WeeklySlot, AssignmentId>,
}

impl InMemoryRouteAssignmentRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

const fn weekly_slot(assignment: &RouteAssignment) -> WeeklySlot {
    (
        assignment.assignee_id(),
        assignment.customer_id(),
        assignment.day(),
    )
}

fn poisoned(err: impl std::fmt::Display) -> RouteRepositoryError {
    RouteRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl RouteAssignmentRepository for InMemoryRouteAssignmentRepository {
    async fn store(&self, assignment: &RouteAssignment) -> RouteRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;

        let slot = weekly_slot(assignment);
        if state.slot_index.contains_key(&slot) {
            let (assignee_id, customer_id, day) = slot;
            return Err(RouteRepositoryError::DuplicateAssignment {
                assignee_id,
                customer_id,
                day,
            });
        }

        state.slot_index.insert(slot, assignment.id());
        state.assignments.insert(assignment.id(), assignment.clone());
        Ok(())
    }

    async fn delete(&self, id: AssignmentId) -> RouteRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let assignment = state
            .assignments
            .remove(&id)
            .ok_or(RouteRepositoryError::NotFound(id))?;
        state.slot_index.remove(&weekly_slot(&assignment));
        Ok(())
    }

    async fn find_by_id(&self, id: AssignmentId) -> RouteRepositoryResult<Option<RouteAssignment>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.assignments.get(&id).cloned())
    }

    async fn list(&self, query: AssignmentQuery) -> RouteRepositoryResult<Vec<RouteAssignment>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .assignments
            .values()
            .filter(|assignment| query.matches(assignment))
            .cloned()
            .collect())
    }
}

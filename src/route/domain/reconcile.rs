//! Pure reconciliation steps: plan expansion, the daily join, and row
//! ordering.
//!
//! The reconciliation engine is split into side-effect-free functions over
//! already-loaded data so the join semantics can be tested without any
//! repository in the loop. The service layer wires these steps to the
//! assignment, visit, and directory ports.

use super::{PlanWindow, ReconciledStop, RouteAssignment, StopOutcome};
use crate::directory::domain::{AssigneeId, CustomerId};
use crate::visit::domain::{VisitOutcome, VisitRecord};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Daily slot key the plan-to-actual join matches on.
pub type DailySlot = (AssigneeId, CustomerId, NaiveDate);

/// One date-expanded instance of a route assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedStop {
    /// Calendar date the assignment recurs on within the window.
    pub plan_date: NaiveDate,
    /// Assignee who walks the route.
    pub assignee_id: AssigneeId,
    /// Customer planned for the date.
    pub customer_id: CustomerId,
}

impl PlannedStop {
    /// Returns the daily slot the stop joins on.
    #[must_use]
    pub const fn slot(&self) -> DailySlot {
        (self.assignee_id, self.customer_id, self.plan_date)
    }
}

/// Expands weekly assignments over every date of the window.
///
/// Each date whose ISO weekday matches an assignment's scheduled day
/// yields one planned stop. An empty window expands to no stops.
#[must_use]
pub fn expand_window(assignments: &[RouteAssignment], window: &PlanWindow) -> Vec<PlannedStop> {
    let mut planned = Vec::new();
    for date in window.days() {
        for assignment in assignments {
            if assignment.day().matches(date) {
                planned.push(PlannedStop {
                    plan_date: date,
                    assignee_id: assignment.assignee_id(),
                    customer_id: assignment.customer_id(),
                });
            }
        }
    }
    planned
}

/// Indexes visit records by their daily slot.
///
/// The store rejects duplicate daily slots, but records predating that
/// constraint can still collide; when they do, the record with the
/// earliest `visit_datetime` wins, ties broken by the lower record id, so
/// the join is deterministic for any input order.
#[must_use]
pub fn index_daily_visits(records: Vec<VisitRecord>) -> HashMap<DailySlot, VisitRecord> {
    let mut index: HashMap<DailySlot, VisitRecord> = HashMap::new();
    for record in records {
        let slot = (
            record.assignee_id(),
            record.customer_id(),
            record.visit_date(),
        );
        match index.entry(slot) {
            Entry::Vacant(entry) => {
                entry.insert(record);
            }
            Entry::Occupied(mut entry) => {
                if wins_slot(&record, entry.get()) {
                    entry.insert(record);
                }
            }
        }
    }
    index
}

/// Classifies a planned stop against its joined visit record.
///
/// Exactly one bucket applies: a matched record with a completed outcome
/// yields [`StopOutcome::Visited`] (the duration is taken from the record,
/// never recomputed), a matched no-visit record yields
/// [`StopOutcome::NoVisit`], and an unmatched stop stays
/// [`StopOutcome::Pending`]. A missing reason label falls back to the raw
/// reason id so the row is never dropped.
#[must_use]
pub fn classify(matched: Option<&VisitRecord>, reason_label: Option<String>) -> StopOutcome {
    let Some(record) = matched else {
        return StopOutcome::Pending;
    };
    match record.outcome() {
        VisitOutcome::Completed { .. } => StopOutcome::Visited {
            visit_id: record.id(),
            visit_datetime: record.visit_datetime(),
            duration: record.duration_minutes(),
        },
        VisitOutcome::NotVisited {
            reason,
            description,
        } => StopOutcome::NoVisit {
            visit_id: record.id(),
            visit_datetime: record.visit_datetime(),
            reason_label: reason_label.unwrap_or_else(|| reason.to_string()),
            description: description.clone(),
        },
    }
}

/// Sorts report rows: `plan_date` descending, then assignee name, customer
/// name, and finally the id pair so equal names order deterministically.
pub fn sort_stops(stops: &mut [ReconciledStop]) {
    stops.sort_by(compare_stops);
}

fn compare_stops(a: &ReconciledStop, b: &ReconciledStop) -> Ordering {
    b.plan_date
        .cmp(&a.plan_date)
        .then_with(|| a.assignee.name.cmp(&b.assignee.name))
        .then_with(|| a.customer.name.cmp(&b.customer.name))
        .then_with(|| a.assignee.id.cmp(&b.assignee.id))
        .then_with(|| a.customer.id.cmp(&b.customer.id))
}

fn wins_slot(candidate: &VisitRecord, current: &VisitRecord) -> bool {
    match candidate.visit_datetime().cmp(&current.visit_datetime()) {
        Ordering::Less => true,
        Ordering::Greater => false,
        Ordering::Equal => candidate.id() < current.id(),
    }
}

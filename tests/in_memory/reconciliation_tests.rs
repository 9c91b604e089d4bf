//! Round-trip tests from the visit session to the reconciliation report.
//!
//! Logs visits through [`VisitSessionService`] and checks they surface in
//! the plan-versus-actual report with the right status and duration.

use crate::in_memory::helpers::{
    assignments, completed_outcome, date, directory, evidence, log_visit, reconciliation_service,
    runtime, seed_directory, session_service, store_assignment, visits, wednesday_clock,
};
use fieldcall::directory::{
    adapters::memory::InMemoryDirectory,
    domain::{AssigneeId, CustomerId, NoVisitReasonId},
};
use fieldcall::route::{
    adapters::memory::InMemoryRouteAssignmentRepository,
    domain::{PlanWindow, StopFilters, StopOutcome},
};
use fieldcall::visit::{
    adapters::memory::{InMemoryEvidenceStore, InMemoryVisitRepository},
    domain::VisitOutcome,
};
use rstest::rstest;
use std::io;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// A visit logged through the session service reports as completed with the
/// session duration.
#[rstest]
fn a_logged_visit_reaches_the_report_as_completed(
    runtime: io::Result<Runtime>,
    visits: Arc<InMemoryVisitRepository>,
    evidence: Arc<InMemoryEvidenceStore>,
    assignments: Arc<InMemoryRouteAssignmentRepository>,
    directory: Arc<InMemoryDirectory>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let rt = runtime?;
    let clock = wednesday_clock()?;
    let assignee_id = AssigneeId::new();
    let customer_id = CustomerId::new();
    seed_directory(&directory, assignee_id, customer_id)?;
    store_assignment(&rt, &assignments, assignee_id, customer_id, 3)?;

    let service = session_service(assignee_id, &visits, &evidence, &clock);
    let completion = log_visit(&rt, &service, &clock, customer_id, completed_outcome(), 900)?;

    let reconciler = reconciliation_service(&assignments, &visits, &directory, &clock);
    let page = rt.block_on(reconciler.reconcile(
        PlanWindow::new(date(2026, 3, 2)?, date(2026, 3, 8)?),
        StopFilters::new(),
        None,
    ))?;

    assert_eq!(page.total, 1);
    let row = page.stops.first().ok_or("expected one report row")?;
    assert_eq!(row.plan_date, date(2026, 3, 4)?);
    assert_eq!(row.customer.name, "Harbour Mart");
    assert_eq!(completion.duration.value(), 15);
    assert!(matches!(
        row.outcome,
        StopOutcome::Visited { visit_id, duration, .. }
            if visit_id == completion.visit_id && duration == Some(completion.duration)
    ));
    Ok(())
}

/// An open session that has not been saved leaves the planned stop pending;
/// the report only sees stored records.
#[rstest]
fn an_unsaved_session_leaves_the_stop_pending(
    runtime: io::Result<Runtime>,
    visits: Arc<InMemoryVisitRepository>,
    evidence: Arc<InMemoryEvidenceStore>,
    assignments: Arc<InMemoryRouteAssignmentRepository>,
    directory: Arc<InMemoryDirectory>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let rt = runtime?;
    let clock = wednesday_clock()?;
    let assignee_id = AssigneeId::new();
    let customer_id = CustomerId::new();
    seed_directory(&directory, assignee_id, customer_id)?;
    store_assignment(&rt, &assignments, assignee_id, customer_id, 3)?;

    let service = session_service(assignee_id, &visits, &evidence, &clock);
    service.start_visit(customer_id, "Harbour Mart")?;

    let reconciler = reconciliation_service(&assignments, &visits, &directory, &clock);
    let page = rt.block_on(reconciler.reconcile(
        PlanWindow::new(date(2026, 3, 2)?, date(2026, 3, 8)?),
        StopFilters::new(),
        None,
    ))?;

    let row = page.stops.first().ok_or("expected one report row")?;
    assert_eq!(row.outcome, StopOutcome::Pending);
    assert!(row.outcome.visit_id().is_none());
    Ok(())
}

/// A no-visit record logged through the session carries its catalogue
/// reason label into the report.
#[rstest]
fn a_no_visit_record_carries_its_reason_into_the_report(
    runtime: io::Result<Runtime>,
    visits: Arc<InMemoryVisitRepository>,
    evidence: Arc<InMemoryEvidenceStore>,
    assignments: Arc<InMemoryRouteAssignmentRepository>,
    directory: Arc<InMemoryDirectory>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let rt = runtime?;
    let clock = wednesday_clock()?;
    let assignee_id = AssigneeId::new();
    let customer_id = CustomerId::new();
    let reason = NoVisitReasonId::new();
    seed_directory(&directory, assignee_id, customer_id)?;
    directory.upsert_no_visit_reason(reason, "Closed for stocktake")?;
    store_assignment(&rt, &assignments, assignee_id, customer_id, 3)?;

    let service = session_service(assignee_id, &visits, &evidence, &clock);
    let outcome = VisitOutcome::NotVisited {
        reason,
        description: Some("metal shutters down".to_owned()),
    };
    log_visit(&rt, &service, &clock, customer_id, outcome, 60)?;

    let reconciler = reconciliation_service(&assignments, &visits, &directory, &clock);
    let page = rt.block_on(reconciler.reconcile(
        PlanWindow::new(date(2026, 3, 2)?, date(2026, 3, 8)?),
        StopFilters::new(),
        None,
    ))?;

    let row = page.stops.first().ok_or("expected one report row")?;
    assert!(row.is_completed());
    assert!(!row.is_visit());
    assert_eq!(row.outcome.reason_label(), Some("Closed for stocktake"));
    Ok(())
}

/// The daily plan flips from pending to completed as the visit is logged.
#[rstest]
fn the_daily_plan_tracks_the_session_lifecycle(
    runtime: io::Result<Runtime>,
    visits: Arc<InMemoryVisitRepository>,
    evidence: Arc<InMemoryEvidenceStore>,
    assignments: Arc<InMemoryRouteAssignmentRepository>,
    directory: Arc<InMemoryDirectory>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let rt = runtime?;
    let clock = wednesday_clock()?;
    let assignee_id = AssigneeId::new();
    let customer_id = CustomerId::new();
    seed_directory(&directory, assignee_id, customer_id)?;
    store_assignment(&rt, &assignments, assignee_id, customer_id, 3)?;
    let reconciler = reconciliation_service(&assignments, &visits, &directory, &clock);

    let before = rt.block_on(reconciler.daily_plan(assignee_id, date(2026, 3, 4)?))?;
    assert_eq!(before.len(), 1);
    assert!(before.iter().all(|row| row.outcome == StopOutcome::Pending));

    let service = session_service(assignee_id, &visits, &evidence, &clock);
    log_visit(&rt, &service, &clock, customer_id, completed_outcome(), 600)?;

    let after = rt.block_on(reconciler.daily_plan(assignee_id, date(2026, 3, 4)?))?;
    assert_eq!(after.len(), 1);
    assert!(after.iter().all(|row| row.is_visit()));
    Ok(())
}

//! Shared fixtures for in-memory integration tests.

use chrono::{NaiveDate, TimeZone, Utc};
use fieldcall::directory::{
    adapters::memory::InMemoryDirectory,
    domain::{
        AssigneeId, AssigneeRole, AssigneeSummary, CustomerId, CustomerSummary, UserId,
        VisitTypeId,
    },
};
use fieldcall::route::{
    adapters::memory::InMemoryRouteAssignmentRepository,
    domain::{NewAssignmentData, RouteAssignment, ScheduledDay},
    ports::RouteAssignmentRepository,
    services::{ReconcileConfig, RouteReconciliationService},
};
use fieldcall::test_support::MutableClock;
use fieldcall::visit::{
    adapters::memory::{InMemoryEvidenceStore, InMemoryVisitRepository},
    domain::{VisitCompletion, VisitOutcome},
    services::{SessionConfig, VisitDraft, VisitSessionService},
};
use mockable::DefaultClock;
use rstest::fixture;
use std::io;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Session service wired to the in-memory adapters.
pub type TestSessionService =
    VisitSessionService<InMemoryVisitRepository, InMemoryEvidenceStore, MutableClock>;

/// Reconciliation service wired to the in-memory adapters.
pub type TestReconciliationService = RouteReconciliationService<
    InMemoryRouteAssignmentRepository,
    InMemoryVisitRepository,
    InMemoryDirectory,
    MutableClock,
>;

/// Provides a tokio runtime for async operations in tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
#[fixture]
pub fn runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Provides a fresh visit repository for each test.
#[fixture]
pub fn visits() -> Arc<InMemoryVisitRepository> {
    Arc::new(InMemoryVisitRepository::new())
}

/// Provides a fresh evidence store for each test.
#[fixture]
pub fn evidence() -> Arc<InMemoryEvidenceStore> {
    Arc::new(InMemoryEvidenceStore::new())
}

/// Provides a fresh assignment repository for each test.
#[fixture]
pub fn assignments() -> Arc<InMemoryRouteAssignmentRepository> {
    Arc::new(InMemoryRouteAssignmentRepository::new())
}

/// Provides a fresh directory for each test.
#[fixture]
pub fn directory() -> Arc<InMemoryDirectory> {
    Arc::new(InMemoryDirectory::new())
}

/// Builds a clock parked on Wednesday 2026-03-04, so day-3 assignments
/// match the current date.
///
/// # Errors
///
/// Returns an error if the fixture timestamp is invalid.
pub fn wednesday_clock() -> Result<Arc<MutableClock>, Box<dyn std::error::Error + Send + Sync>> {
    let now = Utc
        .with_ymd_and_hms(2026, 3, 4, 8, 0, 0)
        .single()
        .ok_or("invalid fixture timestamp")?;
    Ok(Arc::new(MutableClock::new(now)))
}

/// Builds a calendar date for plan windows.
///
/// # Errors
///
/// Returns an error if the date components are invalid.
pub fn date(
    year: i32,
    month: u32,
    day: u32,
) -> Result<NaiveDate, Box<dyn std::error::Error + Send + Sync>> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| "invalid fixture date".into())
}

/// Builds a session service for the given assignee over shared adapters.
pub fn session_service(
    assignee_id: AssigneeId,
    visits: &Arc<InMemoryVisitRepository>,
    evidence: &Arc<InMemoryEvidenceStore>,
    clock: &Arc<MutableClock>,
) -> TestSessionService {
    VisitSessionService::new(
        SessionConfig::new(assignee_id, UserId::new()),
        Arc::clone(visits),
        Arc::clone(evidence),
        Arc::clone(clock),
    )
}

/// Builds a reconciliation service over shared adapters.
pub fn reconciliation_service(
    assignments: &Arc<InMemoryRouteAssignmentRepository>,
    visits: &Arc<InMemoryVisitRepository>,
    directory: &Arc<InMemoryDirectory>,
    clock: &Arc<MutableClock>,
) -> TestReconciliationService {
    RouteReconciliationService::new(
        ReconcileConfig::new(),
        Arc::clone(assignments),
        Arc::clone(visits),
        Arc::clone(directory),
        Arc::clone(clock),
    )
}

/// Seeds the directory with a named assignee and customer pair.
///
/// # Errors
///
/// Returns an error if either summary is rejected.
pub fn seed_directory(
    directory: &InMemoryDirectory,
    assignee_id: AssigneeId,
    customer_id: CustomerId,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    directory.upsert_assignee(AssigneeSummary::new(
        assignee_id,
        "Dana March",
        AssigneeRole::Seller,
    )?)?;
    directory.upsert_customer(CustomerSummary::new(customer_id, "Harbour Mart")?)?;
    Ok(())
}

/// Returns a completed outcome with a fresh visit type.
pub fn completed_outcome() -> VisitOutcome {
    VisitOutcome::Completed {
        visit_type: VisitTypeId::new(),
    }
}

/// Stores a weekly assignment for the given slot.
///
/// # Errors
///
/// Returns an error if the day is out of range or the slot is already taken.
pub fn store_assignment(
    rt: &Runtime,
    assignments: &InMemoryRouteAssignmentRepository,
    assignee_id: AssigneeId,
    customer_id: CustomerId,
    day: u8,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let assignment = RouteAssignment::new(
        NewAssignmentData {
            assignee_id,
            customer_id,
            day: ScheduledDay::new(day)?,
            created_by: UserId::new(),
        },
        &DefaultClock,
    );
    rt.block_on(assignments.store(&assignment))?;
    Ok(())
}

/// Drives one visit through start, save, and end, holding the session open
/// for the given stretch of clock time.
///
/// # Errors
///
/// Returns an error if any session transition fails.
pub fn log_visit(
    rt: &Runtime,
    service: &TestSessionService,
    clock: &MutableClock,
    customer_id: CustomerId,
    outcome: VisitOutcome,
    seconds_on_site: i64,
) -> Result<VisitCompletion, Box<dyn std::error::Error + Send + Sync>> {
    service.start_visit(customer_id, "Harbour Mart")?;
    rt.block_on(service.save_visit(VisitDraft::new(customer_id, outcome)))?;
    clock.advance_seconds(seconds_on_site);
    Ok(rt.block_on(service.end_visit())?)
}

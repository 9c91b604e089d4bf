//! Visit session lifecycle tests through the public crate surface.
//!
//! Drives start, save, and end against [`VisitSessionService`] with the
//! in-memory adapters and a movable clock.

use crate::in_memory::helpers::{
    completed_outcome, evidence, log_visit, runtime, session_service, visits, wednesday_clock,
};
use fieldcall::directory::domain::{AssigneeId, CustomerId};
use fieldcall::visit::{
    adapters::memory::{InMemoryEvidenceStore, InMemoryVisitRepository},
    domain::PhotoStage,
    ports::{VisitRecordRepository, VisitRepositoryError},
    services::{PendingPhoto, SaveVisitError, SessionError, SessionStart, VisitDraft},
};
use rstest::rstest;
use std::io;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Runs start, save, end and checks the rounded duration lands on the record.
#[rstest]
fn full_lifecycle_writes_the_rounded_duration(
    runtime: io::Result<Runtime>,
    visits: Arc<InMemoryVisitRepository>,
    evidence: Arc<InMemoryEvidenceStore>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let rt = runtime?;
    let clock = wednesday_clock()?;
    let customer_id = CustomerId::new();
    let service = session_service(AssigneeId::new(), &visits, &evidence, &clock);

    let completion = log_visit(&rt, &service, &clock, customer_id, completed_outcome(), 125)?;

    assert_eq!(completion.duration.value(), 2);
    let record = rt
        .block_on(visits.find_by_id(completion.visit_id))?
        .ok_or("stored record should exist")?;
    assert_eq!(record.duration_minutes().map(|d| d.value()), Some(2));
    assert!(service.active_visit()?.is_none(), "session should be idle");
    Ok(())
}

/// A sub-minute stay still reports one minute on site.
#[rstest]
fn sub_minute_visits_floor_to_one_minute(
    runtime: io::Result<Runtime>,
    visits: Arc<InMemoryVisitRepository>,
    evidence: Arc<InMemoryEvidenceStore>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let rt = runtime?;
    let clock = wednesday_clock()?;
    let customer_id = CustomerId::new();
    let service = session_service(AssigneeId::new(), &visits, &evidence, &clock);

    let completion = log_visit(&rt, &service, &clock, customer_id, completed_outcome(), 20)?;

    assert_eq!(completion.duration.value(), 1);
    Ok(())
}

/// Ending an unsaved session is rejected and leaves it in progress.
#[rstest]
fn ending_before_saving_is_rejected(
    runtime: io::Result<Runtime>,
    visits: Arc<InMemoryVisitRepository>,
    evidence: Arc<InMemoryEvidenceStore>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let rt = runtime?;
    let clock = wednesday_clock()?;
    let customer_id = CustomerId::new();
    let service = session_service(AssigneeId::new(), &visits, &evidence, &clock);
    service.start_visit(customer_id, "Harbour Mart")?;

    let blocked = rt.block_on(service.end_visit());

    assert!(matches!(blocked, Err(SessionError::UnsavedVisit)));
    assert!(
        service.active_visit()?.is_some(),
        "session should stay in progress"
    );

    rt.block_on(service.save_visit(VisitDraft::new(customer_id, completed_outcome())))?;
    rt.block_on(service.end_visit())?;
    assert!(service.active_visit()?.is_none());
    Ok(())
}

/// A second customer cannot start while another visit is open; the same
/// customer re-enters the existing session.
#[rstest]
fn a_second_customer_cannot_start_while_one_is_active(
    visits: Arc<InMemoryVisitRepository>,
    evidence: Arc<InMemoryEvidenceStore>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let clock = wednesday_clock()?;
    let first = CustomerId::new();
    let second = CustomerId::new();
    let service = session_service(AssigneeId::new(), &visits, &evidence, &clock);

    let started = service.start_visit(first, "Harbour Mart")?;
    assert!(matches!(started, SessionStart::Started(_)));

    let conflict = service.start_visit(second, "Bayside Grocer");
    assert!(
        matches!(conflict, Err(SessionError::VisitInProgress(busy)) if busy == first),
        "expected a conflict for the open visit"
    );

    let reentry = service.start_visit(first, "Harbour Mart")?;
    assert!(matches!(reentry, SessionStart::AlreadyActive(_)));
    assert_eq!(reentry.snapshot().customer_id, first);
    Ok(())
}

/// Saving again before ending edits the same record instead of inserting.
#[rstest]
fn saving_twice_updates_a_single_record(
    runtime: io::Result<Runtime>,
    visits: Arc<InMemoryVisitRepository>,
    evidence: Arc<InMemoryEvidenceStore>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let rt = runtime?;
    let clock = wednesday_clock()?;
    let customer_id = CustomerId::new();
    let service = session_service(AssigneeId::new(), &visits, &evidence, &clock);
    service.start_visit(customer_id, "Harbour Mart")?;

    let first =
        rt.block_on(service.save_visit(VisitDraft::new(customer_id, completed_outcome())))?;
    let edit = VisitDraft::new(customer_id, completed_outcome()).with_description("shelf rebuilt");
    let second = rt.block_on(service.save_visit(edit))?;

    assert_eq!(second.id(), first.id());
    let stored = rt
        .block_on(visits.find_by_id(first.id()))?
        .ok_or("stored record should exist")?;
    assert_eq!(stored.description(), Some("shelf rebuilt"));
    rt.block_on(service.end_visit())?;
    Ok(())
}

/// The repository rejects a second record for the same customer and day.
#[rstest]
fn a_second_daily_visit_to_the_same_customer_is_rejected(
    runtime: io::Result<Runtime>,
    visits: Arc<InMemoryVisitRepository>,
    evidence: Arc<InMemoryEvidenceStore>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let rt = runtime?;
    let clock = wednesday_clock()?;
    let customer_id = CustomerId::new();
    let service = session_service(AssigneeId::new(), &visits, &evidence, &clock);
    log_visit(&rt, &service, &clock, customer_id, completed_outcome(), 300)?;

    service.start_visit(customer_id, "Harbour Mart")?;
    let retry = rt.block_on(service.save_visit(VisitDraft::new(customer_id, completed_outcome())));

    assert!(matches!(
        retry,
        Err(SaveVisitError::Repository(
            VisitRepositoryError::DuplicateDailyVisit { .. }
        ))
    ));
    assert!(
        service.active_visit()?.is_some(),
        "failed save keeps the session open"
    );
    Ok(())
}

/// Pending photos upload during the save and land on the record.
#[rstest]
fn pending_photos_upload_during_save(
    runtime: io::Result<Runtime>,
    visits: Arc<InMemoryVisitRepository>,
    evidence: Arc<InMemoryEvidenceStore>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let rt = runtime?;
    let clock = wednesday_clock()?;
    let customer_id = CustomerId::new();
    let service = session_service(AssigneeId::new(), &visits, &evidence, &clock);
    service.start_visit(customer_id, "Harbour Mart")?;

    let draft = VisitDraft::new(customer_id, completed_outcome())
        .with_pending_photo(PendingPhoto::new(PhotoStage::Before, b"front shelf".to_vec()))
        .with_pending_photo(PendingPhoto::new(PhotoStage::After, b"restocked".to_vec()));
    let record = rt.block_on(service.save_visit(draft))?;

    assert_eq!(record.photos().len(), 2);
    assert_eq!(evidence.object_count()?, 2);
    let before = record.photos().urls(PhotoStage::Before);
    let url = before.first().ok_or("before photo should be stored")?;
    assert!(evidence.contains(url)?);
    Ok(())
}

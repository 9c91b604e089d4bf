//! Service orchestration tests for the visit session lifecycle.

use std::sync::Arc;

use eyre::{bail, ensure};
use rstest::{fixture, rstest};

use super::{MutableClock, fixture_timestamp};
use crate::directory::domain::{AssigneeId, CustomerId, NoVisitReasonId, UserId, VisitTypeId};
use crate::visit::{
    adapters::memory::{InMemoryEvidenceStore, InMemoryVisitRepository},
    domain::{PhotoStage, VisitOutcome},
    ports::{EvidenceStoreError, MockEvidenceStore, VisitRecordRepository},
    services::{
        PendingPhoto, SaveVisitError, SessionConfig, SessionError, SessionStart, VisitDraft,
        VisitSessionService,
    },
};

type TestService =
    VisitSessionService<InMemoryVisitRepository, InMemoryEvidenceStore, MutableClock>;

struct Harness {
    service: TestService,
    visits: Arc<InMemoryVisitRepository>,
    evidence: Arc<InMemoryEvidenceStore>,
    clock: Arc<MutableClock>,
    assignee_id: AssigneeId,
    customer_id: CustomerId,
}

#[fixture]
fn harness() -> Harness {
    let visits = Arc::new(InMemoryVisitRepository::new());
    let evidence = Arc::new(InMemoryEvidenceStore::new());
    let clock = Arc::new(MutableClock::new(fixture_timestamp()));
    let assignee_id = AssigneeId::new();
    let service = VisitSessionService::new(
        SessionConfig::new(assignee_id, UserId::new()),
        Arc::clone(&visits),
        Arc::clone(&evidence),
        Arc::clone(&clock),
    );
    Harness {
        service,
        visits,
        evidence,
        clock,
        assignee_id,
        customer_id: CustomerId::new(),
    }
}

fn completed_draft(customer_id: CustomerId) -> VisitDraft {
    VisitDraft::new(
        customer_id,
        VisitOutcome::Completed {
            visit_type: VisitTypeId::new(),
        },
    )
}

fn not_visited_draft(customer_id: CustomerId) -> VisitDraft {
    VisitDraft::new(
        customer_id,
        VisitOutcome::NotVisited {
            reason: NoVisitReasonId::new(),
            description: Some("gate locked".to_owned()),
        },
    )
}

#[rstest]
fn start_visit_opens_a_new_session(harness: Harness) -> eyre::Result<()> {
    let start = harness
        .service
        .start_visit(harness.customer_id, "Harbour Mart")?;

    let SessionStart::Started(snapshot) = start else {
        bail!("expected a fresh session, got {start:?}");
    };
    ensure!(snapshot.customer_id == harness.customer_id);
    ensure!(snapshot.customer_name == "Harbour Mart");
    ensure!(!snapshot.saved);
    ensure!(harness.service.active_visit()?.is_some());
    Ok(())
}

#[rstest]
fn start_visit_reenters_the_same_customers_session(harness: Harness) -> eyre::Result<()> {
    harness
        .service
        .start_visit(harness.customer_id, "Harbour Mart")?;
    harness.clock.advance_seconds(200);

    let start = harness
        .service
        .start_visit(harness.customer_id, "Harbour Mart")?;

    let SessionStart::AlreadyActive(snapshot) = start else {
        bail!("expected to re-enter the session, got {start:?}");
    };
    ensure!(snapshot.started_at == fixture_timestamp());
    Ok(())
}

#[rstest]
fn start_visit_rejects_a_second_customer(harness: Harness) -> eyre::Result<()> {
    harness
        .service
        .start_visit(harness.customer_id, "Harbour Mart")?;

    let result = harness.service.start_visit(CustomerId::new(), "Corner Shop");

    let Err(SessionError::VisitInProgress(blocking)) = result else {
        bail!("expected the in-progress visit to block, got {result:?}");
    };
    ensure!(blocking == harness.customer_id);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn save_visit_inserts_the_record_on_first_save(harness: Harness) -> eyre::Result<()> {
    harness
        .service
        .start_visit(harness.customer_id, "Harbour Mart")?;

    let record = harness
        .service
        .save_visit(completed_draft(harness.customer_id))
        .await?;

    let stored = harness.visits.find_by_id(record.id()).await?;
    ensure!(stored.as_ref() == Some(&record));
    ensure!(record.assignee_id() == harness.assignee_id);
    ensure!(record.visit_datetime() == fixture_timestamp());

    let snapshot = harness.service.require_active()?;
    ensure!(snapshot.saved);
    ensure!(snapshot.visit_id == Some(record.id()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn save_visit_updates_the_record_on_an_edit_cycle(harness: Harness) -> eyre::Result<()> {
    harness
        .service
        .start_visit(harness.customer_id, "Harbour Mart")?;
    let first = harness
        .service
        .save_visit(completed_draft(harness.customer_id))
        .await?;

    let second = harness
        .service
        .save_visit(not_visited_draft(harness.customer_id))
        .await?;

    ensure!(second.id() == first.id());
    ensure!(!second.outcome().is_visit());
    ensure!(second.description() == Some("gate locked"));

    let stored = harness
        .visits
        .find_daily(
            harness.assignee_id,
            harness.customer_id,
            fixture_timestamp().date_naive(),
        )
        .await?
        .ok_or_else(|| eyre::eyre!("the daily record should still exist"))?;
    ensure!(!stored.outcome().is_visit());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn save_visit_rejects_a_mismatched_draft_customer(harness: Harness) -> eyre::Result<()> {
    harness
        .service
        .start_visit(harness.customer_id, "Harbour Mart")?;
    let other_customer = CustomerId::new();

    let result = harness
        .service
        .save_visit(completed_draft(other_customer))
        .await;

    let Err(SaveVisitError::CustomerMismatch { draft, active }) = result else {
        bail!("expected a customer mismatch, got {result:?}");
    };
    ensure!(draft == other_customer);
    ensure!(active == harness.customer_id);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn save_visit_requires_an_active_session(harness: Harness) {
    let result = harness
        .service
        .save_visit(completed_draft(harness.customer_id))
        .await;

    assert!(matches!(
        result,
        Err(SaveVisitError::Session(SessionError::NoActiveVisit))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn save_visit_uploads_pending_evidence(harness: Harness) -> eyre::Result<()> {
    harness
        .service
        .start_visit(harness.customer_id, "Harbour Mart")?;
    let draft = completed_draft(harness.customer_id)
        .with_pending_photo(PendingPhoto::new(PhotoStage::Before, b"before".to_vec()))
        .with_pending_photo(PendingPhoto::new(PhotoStage::After, b"after".to_vec()));

    let record = harness.service.save_visit(draft).await?;

    ensure!(record.photos().len() == 2);
    ensure!(harness.evidence.object_count()? == 2);
    for url in record.photos().urls(PhotoStage::Before) {
        ensure!(harness.evidence.contains(url)?);
    }
    for url in record.photos().urls(PhotoStage::After) {
        ensure!(harness.evidence.contains(url)?);
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn end_visit_is_rejected_before_the_first_save(harness: Harness) -> eyre::Result<()> {
    harness
        .service
        .start_visit(harness.customer_id, "Harbour Mart")?;

    let result = harness.service.end_visit().await;

    ensure!(matches!(result, Err(SessionError::UnsavedVisit)));
    ensure!(harness.service.active_visit()?.is_some());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn end_visit_records_the_rounded_duration_and_clears_the_session(
    harness: Harness,
) -> eyre::Result<()> {
    harness
        .service
        .start_visit(harness.customer_id, "Harbour Mart")?;
    let record = harness
        .service
        .save_visit(completed_draft(harness.customer_id))
        .await?;
    harness.clock.advance_seconds(125);

    let completion = harness.service.end_visit().await?;

    ensure!(completion.visit_id == record.id());
    ensure!(completion.duration.value() == 2);

    let stored = harness
        .visits
        .find_by_id(record.id())
        .await?
        .ok_or_else(|| eyre::eyre!("the record should survive the session"))?;
    ensure!(stored.duration_minutes() == Some(completion.duration));
    ensure!(harness.service.active_visit()?.is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn short_visits_floor_to_one_minute(harness: Harness) -> eyre::Result<()> {
    harness
        .service
        .start_visit(harness.customer_id, "Harbour Mart")?;
    harness
        .service
        .save_visit(completed_draft(harness.customer_id))
        .await?;
    harness.clock.advance_seconds(20);

    let completion = harness.service.end_visit().await?;

    ensure!(completion.duration.value() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn end_visit_requires_an_active_session(harness: Harness) {
    let result = harness.service.end_visit().await;
    assert!(matches!(result, Err(SessionError::NoActiveVisit)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn evidence_failure_leaves_the_session_unsaved(harness: Harness) -> eyre::Result<()> {
    let mut store = MockEvidenceStore::new();
    store.expect_put().returning(|_, _| {
        Err(EvidenceStoreError::storage(std::io::Error::other(
            "bucket unavailable",
        )))
    });
    let service = VisitSessionService::new(
        SessionConfig::new(harness.assignee_id, UserId::new()),
        Arc::clone(&harness.visits),
        Arc::new(store),
        Arc::clone(&harness.clock),
    );
    service.start_visit(harness.customer_id, "Harbour Mart")?;
    let draft = completed_draft(harness.customer_id)
        .with_pending_photo(PendingPhoto::new(PhotoStage::Before, b"before".to_vec()));

    let result = service.save_visit(draft).await;

    ensure!(matches!(result, Err(SaveVisitError::Evidence(_))));
    let snapshot = service.require_active()?;
    ensure!(!snapshot.saved);
    ensure!(snapshot.visit_id.is_none());
    let stored = harness
        .visits
        .find_daily(
            harness.assignee_id,
            harness.customer_id,
            fixture_timestamp().date_naive(),
        )
        .await?;
    ensure!(stored.is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_new_visit_can_start_after_the_previous_one_ends(harness: Harness) -> eyre::Result<()> {
    harness
        .service
        .start_visit(harness.customer_id, "Harbour Mart")?;
    harness
        .service
        .save_visit(completed_draft(harness.customer_id))
        .await?;
    harness.service.end_visit().await?;

    let start = harness
        .service
        .start_visit(CustomerId::new(), "Corner Shop")?;

    ensure!(matches!(start, SessionStart::Started(_)));
    Ok(())
}

//! Unit tests for the evidence photo upload saga.

use std::sync::Arc;

use eyre::{bail, ensure};
use rstest::rstest;

use crate::visit::adapters::memory::InMemoryEvidenceStore;
use crate::visit::domain::PhotoStage;
use crate::visit::ports::{EvidenceStoreError, MockEvidenceStore, ObjectKey};
use crate::visit::services::{EvidenceFailurePolicy, EvidenceUploadSaga, PendingPhoto};

fn pending_pair() -> Vec<PendingPhoto> {
    vec![
        PendingPhoto::new(PhotoStage::Before, b"shelf before".to_vec()),
        PendingPhoto::new(PhotoStage::After, b"shelf after".to_vec()),
    ]
}

fn failing_put() -> EvidenceStoreError {
    EvidenceStoreError::storage(std::io::Error::other("bucket unavailable"))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn run_uploads_every_photo_in_order() -> eyre::Result<()> {
    let store = Arc::new(InMemoryEvidenceStore::new());
    let saga = EvidenceUploadSaga::new(Arc::clone(&store), EvidenceFailurePolicy::RollBack);

    let uploaded = match saga.run(pending_pair()).await {
        Ok(uploaded) => uploaded,
        Err(failure) => bail!("uploads should succeed, got {failure}"),
    };

    ensure!(uploaded.len() == 2);
    ensure!(uploaded.first().map(|photo| photo.stage) == Some(PhotoStage::Before));
    ensure!(uploaded.last().map(|photo| photo.stage) == Some(PhotoStage::After));
    for photo in &uploaded {
        ensure!(store.contains(&photo.url)?);
    }
    ensure!(store.object_count()? == 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn identical_photo_bytes_share_one_stored_object() -> eyre::Result<()> {
    let store = Arc::new(InMemoryEvidenceStore::new());
    let saga = EvidenceUploadSaga::new(Arc::clone(&store), EvidenceFailurePolicy::RollBack);
    let pending = vec![
        PendingPhoto::new(PhotoStage::Before, b"same shot".to_vec()),
        PendingPhoto::new(PhotoStage::Before, b"same shot".to_vec()),
    ];

    let uploaded = match saga.run(pending).await {
        Ok(uploaded) => uploaded,
        Err(failure) => bail!("uploads should succeed, got {failure}"),
    };

    ensure!(uploaded.first().map(|photo| &photo.url) == uploaded.last().map(|photo| &photo.url));
    ensure!(store.object_count()? == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn run_with_no_pending_photos_is_a_no_op() -> eyre::Result<()> {
    let store = Arc::new(InMemoryEvidenceStore::new());
    let saga = EvidenceUploadSaga::new(Arc::clone(&store), EvidenceFailurePolicy::RollBack);

    let uploaded = match saga.run(Vec::new()).await {
        Ok(uploaded) => uploaded,
        Err(failure) => bail!("empty runs should succeed, got {failure}"),
    };

    ensure!(uploaded.is_empty());
    ensure!(store.object_count()? == 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn roll_back_deletes_completed_uploads_on_failure() -> eyre::Result<()> {
    let mut store = MockEvidenceStore::new();
    let mut sequence = mockall::Sequence::new();
    store
        .expect_put()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|key, _| Ok(format!("mock:{key}")));
    store
        .expect_put()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_, _| Err(failing_put()));
    store.expect_delete().times(1).returning(|_| Ok(()));
    let saga = EvidenceUploadSaga::new(Arc::new(store), EvidenceFailurePolicy::RollBack);

    let Err(failure) = saga.run(pending_pair()).await else {
        bail!("the second upload should fail the run");
    };

    let first_url = format!(
        "mock:{}",
        ObjectKey::for_bytes(PhotoStage::Before, b"shelf before")
    );
    ensure!(failure.failed == ObjectKey::for_bytes(PhotoStage::After, b"shelf after"));
    ensure!(failure.kept.is_empty());
    ensure!(failure.rolled_back == [first_url]);
    ensure!(failure.orphaned.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn roll_back_reports_orphans_when_deletion_fails() -> eyre::Result<()> {
    let mut store = MockEvidenceStore::new();
    let mut sequence = mockall::Sequence::new();
    store
        .expect_put()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|key, _| Ok(format!("mock:{key}")));
    store
        .expect_put()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_, _| Err(failing_put()));
    store
        .expect_delete()
        .times(1)
        .returning(|url| Err(EvidenceStoreError::NotFound(url.to_owned())));
    let saga = EvidenceUploadSaga::new(Arc::new(store), EvidenceFailurePolicy::RollBack);

    let Err(failure) = saga.run(pending_pair()).await else {
        bail!("the second upload should fail the run");
    };

    let first_url = format!(
        "mock:{}",
        ObjectKey::for_bytes(PhotoStage::Before, b"shelf before")
    );
    ensure!(failure.rolled_back.is_empty());
    ensure!(failure.orphaned == [first_url]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn resume_keeps_completed_uploads_for_retry() -> eyre::Result<()> {
    let mut store = MockEvidenceStore::new();
    let mut sequence = mockall::Sequence::new();
    store
        .expect_put()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|key, _| Ok(format!("mock:{key}")));
    store
        .expect_put()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_, _| Err(failing_put()));
    let saga = EvidenceUploadSaga::new(Arc::new(store), EvidenceFailurePolicy::Resume);

    let Err(failure) = saga.run(pending_pair()).await else {
        bail!("the second upload should fail the run");
    };

    let first_url = format!(
        "mock:{}",
        ObjectKey::for_bytes(PhotoStage::Before, b"shelf before")
    );
    ensure!(failure.kept.len() == 1);
    ensure!(failure.kept.first().map(|photo| photo.url.clone()) == Some(first_url));
    ensure!(failure.rolled_back.is_empty());
    ensure!(failure.orphaned.is_empty());
    Ok(())
}

#[rstest]
fn object_keys_are_content_addressed() {
    let first = PendingPhoto::new(PhotoStage::Before, b"payload".to_vec());
    let second = PendingPhoto::new(PhotoStage::Before, b"payload".to_vec());
    let different = PendingPhoto::new(PhotoStage::After, b"payload".to_vec());

    assert_eq!(first.object_key(), second.object_key());
    assert_ne!(first.object_key(), different.object_key());
    assert!(
        first
            .object_key()
            .to_string()
            .starts_with(&format!("{}/", PhotoStage::Before.as_str()))
    );
}

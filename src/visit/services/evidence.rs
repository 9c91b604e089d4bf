//! Evidence photo upload saga.
//!
//! The original client pushed photos to storage one by one and saved the
//! visit form regardless of how many uploads actually landed, silently
//! orphaning the rest. The saga makes each upload an explicit step with a
//! content-addressed key and reports exactly what happened when a step
//! fails, so the caller can retry or clean up deliberately.

use crate::visit::domain::PhotoStage;
use crate::visit::ports::{EvidenceStore, EvidenceStoreError, ObjectKey};
use std::sync::Arc;
use thiserror::Error;

/// What to do with already-uploaded photos when a later upload fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EvidenceFailurePolicy {
    /// Delete completed uploads; deletions that fail are reported as
    /// orphans.
    #[default]
    RollBack,
    /// Keep completed uploads and report them, so a retry of the same draft
    /// re-uses them (keys are content-derived and therefore stable).
    Resume,
}

/// A photo captured on the device, awaiting upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPhoto {
    stage: PhotoStage,
    bytes: Vec<u8>,
}

impl PendingPhoto {
    /// Creates a pending photo from captured bytes.
    #[must_use]
    pub const fn new(stage: PhotoStage, bytes: Vec<u8>) -> Self {
        Self { stage, bytes }
    }

    /// Returns the capture stage.
    #[must_use]
    pub const fn stage(&self) -> PhotoStage {
        self.stage
    }

    /// Returns the object key this photo uploads under.
    #[must_use]
    pub fn object_key(&self) -> ObjectKey {
        ObjectKey::for_bytes(self.stage, &self.bytes)
    }
}

/// A successfully stored photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedPhoto {
    /// Capture stage the photo belongs to.
    pub stage: PhotoStage,
    /// URL the store minted for the object.
    pub url: String,
}

/// Step report for a failed evidence upload run.
///
/// Exactly one of `kept` and `rolled_back`/`orphaned` is populated,
/// depending on the saga's failure policy.
#[derive(Debug, Clone, Error)]
#[error("evidence upload failed at {failed}: {cause}")]
pub struct EvidenceUploadFailure {
    /// Key of the step that failed.
    pub failed: ObjectKey,
    /// Store error that broke the run.
    #[source]
    pub cause: EvidenceStoreError,
    /// Completed uploads retained for a later retry (resume policy).
    pub kept: Vec<UploadedPhoto>,
    /// URLs deleted while rolling back (roll-back policy).
    pub rolled_back: Vec<String>,
    /// URLs whose roll-back deletion itself failed and which now sit
    /// unreferenced in the store.
    pub orphaned: Vec<String>,
}

/// Uploads a batch of pending photos as an all-or-nothing saga.
#[derive(Debug, Clone)]
pub struct EvidenceUploadSaga<E> {
    store: Arc<E>,
    policy: EvidenceFailurePolicy,
}

impl<E> EvidenceUploadSaga<E>
where
    E: EvidenceStore,
{
    /// Creates a saga over the given store.
    #[must_use]
    pub const fn new(store: Arc<E>, policy: EvidenceFailurePolicy) -> Self {
        Self { store, policy }
    }

    /// Returns the configured failure policy.
    #[must_use]
    pub const fn policy(&self) -> EvidenceFailurePolicy {
        self.policy
    }

    /// Uploads every pending photo, in order.
    ///
    /// Returns the stored URLs when every step succeeds. On a step failure
    /// the failure policy decides what happens to the uploads that had
    /// already completed, and the report says what was kept, deleted, or
    /// orphaned.
    ///
    /// # Errors
    ///
    /// Returns [`EvidenceUploadFailure`] when any upload step fails.
    pub async fn run(
        &self,
        pending: Vec<PendingPhoto>,
    ) -> Result<Vec<UploadedPhoto>, EvidenceUploadFailure> {
        let mut completed = Vec::with_capacity(pending.len());
        for photo in pending {
            let key = photo.object_key();
            match self.store.put(&key, &photo.bytes).await {
                Ok(url) => completed.push(UploadedPhoto {
                    stage: photo.stage,
                    url,
                }),
                Err(cause) => return Err(self.settle_failure(key, cause, completed).await),
            }
        }
        Ok(completed)
    }

    async fn settle_failure(
        &self,
        failed: ObjectKey,
        cause: EvidenceStoreError,
        completed: Vec<UploadedPhoto>,
    ) -> EvidenceUploadFailure {
        match self.policy {
            EvidenceFailurePolicy::Resume => EvidenceUploadFailure {
                failed,
                cause,
                kept: completed,
                rolled_back: Vec::new(),
                orphaned: Vec::new(),
            },
            EvidenceFailurePolicy::RollBack => {
                let mut rolled_back = Vec::new();
                let mut orphaned = Vec::new();
                for upload in completed {
                    match self.store.delete(&upload.url).await {
                        Ok(()) => rolled_back.push(upload.url),
                        Err(delete_error) => {
                            tracing::warn!(
                                url = %upload.url,
                                error = %delete_error,
                                "evidence roll-back delete failed, object orphaned"
                            );
                            orphaned.push(upload.url);
                        }
                    }
                }
                EvidenceUploadFailure {
                    failed,
                    cause,
                    kept: Vec::new(),
                    rolled_back,
                    orphaned,
                }
            }
        }
    }
}

//! Service layer owning the in-progress visit session.
//!
//! One service instance exists per authenticated user and is shared as
//! `Arc<VisitSessionService<..>>` by every view that reads or advances the
//! session. The session lock is held only for short synchronous sections,
//! never across awaits.

use crate::directory::domain::{AssigneeId, CustomerId, UserId};
use crate::visit::{
    domain::{
        ActiveVisit, ActiveVisitSnapshot, EvidencePhotos, NewVisitData, VisitCompletion,
        VisitDomainError, VisitId, VisitOutcome, VisitRecord,
    },
    ports::{EvidenceStore, VisitRecordRepository, VisitRepositoryError},
    services::evidence::{
        EvidenceFailurePolicy, EvidenceUploadFailure, EvidenceUploadSaga, PendingPhoto,
        UploadedPhoto,
    },
};
use mockable::Clock;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Identity and policy for one user's visit session service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Assignee whose visits the session records.
    pub assignee_id: AssigneeId,
    /// User logging the visits (audit trail).
    pub created_by: UserId,
    /// What to do with partial evidence uploads when a save fails.
    pub evidence_policy: EvidenceFailurePolicy,
}

impl SessionConfig {
    /// Creates a config with the default roll-back evidence policy.
    #[must_use]
    pub const fn new(assignee_id: AssigneeId, created_by: UserId) -> Self {
        Self {
            assignee_id,
            created_by,
            evidence_policy: EvidenceFailurePolicy::RollBack,
        }
    }

    /// Overrides the evidence failure policy.
    #[must_use]
    pub const fn with_evidence_policy(mut self, policy: EvidenceFailurePolicy) -> Self {
        self.evidence_policy = policy;
        self
    }
}

/// Outcome of a `start_visit` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStart {
    /// A new session was created for the customer.
    Started(ActiveVisitSnapshot),
    /// A session for the same customer was already in progress; the caller
    /// re-enters the existing visit form.
    AlreadyActive(ActiveVisitSnapshot),
}

impl SessionStart {
    /// Returns the snapshot carried by either variant.
    #[must_use]
    pub const fn snapshot(&self) -> &ActiveVisitSnapshot {
        match self {
            Self::Started(snapshot) | Self::AlreadyActive(snapshot) => snapshot,
        }
    }
}

/// Form data for saving the in-progress visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitDraft {
    customer_id: CustomerId,
    outcome: VisitOutcome,
    description: Option<String>,
    stored_photos: EvidencePhotos,
    pending_photos: Vec<PendingPhoto>,
}

impl VisitDraft {
    /// Creates a draft with the required outcome selection.
    #[must_use]
    pub const fn new(customer_id: CustomerId, outcome: VisitOutcome) -> Self {
        Self {
            customer_id,
            outcome,
            description: None,
            stored_photos: EvidencePhotos::new(),
            pending_photos: Vec::new(),
        }
    }

    /// Sets the free-text visit notes.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Carries URLs already stored by an earlier attempt or edit cycle;
    /// these pass through without re-upload.
    #[must_use]
    pub fn with_stored_photos(mut self, photos: EvidencePhotos) -> Self {
        self.stored_photos = photos;
        self
    }

    /// Adds a freshly captured photo to upload during the save.
    #[must_use]
    pub fn with_pending_photo(mut self, photo: PendingPhoto) -> Self {
        self.pending_photos.push(photo);
        self
    }
}

/// Session-state errors for visit lifecycle operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Another customer's visit is already in progress.
    #[error("a visit at customer {0} is already in progress")]
    VisitInProgress(CustomerId),

    /// No visit is in progress.
    #[error("no visit is in progress")]
    NoActiveVisit,

    /// The in-progress visit has not been saved yet.
    #[error("the in-progress visit has not been saved yet, save the visit form first")]
    UnsavedVisit,

    /// The session lock was poisoned by a panicking thread.
    #[error("session state unavailable: {0}")]
    StatePoisoned(String),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] VisitDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] VisitRepositoryError),
}

/// Errors returned while saving the in-progress visit.
#[derive(Debug, Error)]
pub enum SaveVisitError {
    /// Session-state precondition failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The draft's customer does not match the in-progress visit.
    #[error("draft customer {draft} does not match the in-progress visit at {active}")]
    CustomerMismatch {
        /// Customer carried by the draft.
        draft: CustomerId,
        /// Customer of the in-progress visit.
        active: CustomerId,
    },

    /// Evidence uploads failed; the report says what was kept or removed.
    #[error(transparent)]
    Evidence(#[from] Box<EvidenceUploadFailure>),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] VisitDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] VisitRepositoryError),
}

/// Visit session orchestration service.
///
/// Owns the at-most-one in-progress visit for its user and coordinates the
/// save and end transitions against the record repository and evidence
/// store.
pub struct VisitSessionService<R, E, C>
where
    R: VisitRecordRepository,
    E: EvidenceStore,
    C: Clock + Send + Sync,
{
    config: SessionConfig,
    visits: Arc<R>,
    evidence: EvidenceUploadSaga<E>,
    clock: Arc<C>,
    session: RwLock<Option<ActiveVisit>>,
}

impl<R, E, C> VisitSessionService<R, E, C>
where
    R: VisitRecordRepository,
    E: EvidenceStore,
    C: Clock + Send + Sync,
{
    /// Creates a session service for one user.
    #[must_use]
    pub fn new(config: SessionConfig, visits: Arc<R>, evidence: Arc<E>, clock: Arc<C>) -> Self {
        Self {
            config,
            visits,
            evidence: EvidenceUploadSaga::new(evidence, config.evidence_policy),
            clock,
            session: RwLock::new(None),
        }
    }

    /// Starts a visit at the given customer, or re-enters the session
    /// already in progress for the same customer.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::VisitInProgress`] when a different customer's
    /// visit is active, leaving the session unchanged.
    pub fn start_visit(
        &self,
        customer_id: CustomerId,
        customer_name: impl Into<String>,
    ) -> Result<SessionStart, SessionError> {
        let mut slot = self
            .session
            .write()
            .map_err(|err| SessionError::StatePoisoned(err.to_string()))?;

        match slot.as_ref() {
            None => {
                let active = ActiveVisit::start(customer_id, customer_name, &*self.clock)?;
                let snapshot = active.snapshot();
                *slot = Some(active);
                Ok(SessionStart::Started(snapshot))
            }
            Some(active) if active.customer_id() == customer_id => {
                Ok(SessionStart::AlreadyActive(active.snapshot()))
            }
            Some(active) => Err(SessionError::VisitInProgress(active.customer_id())),
        }
    }

    /// Returns a snapshot of the in-progress visit, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::StatePoisoned`] when the session lock is
    /// poisoned.
    pub fn active_visit(&self) -> Result<Option<ActiveVisitSnapshot>, SessionError> {
        let slot = self
            .session
            .read()
            .map_err(|err| SessionError::StatePoisoned(err.to_string()))?;
        Ok(slot.as_ref().map(ActiveVisit::snapshot))
    }

    /// Guard for views that only make sense inside a visit (evidence forms,
    /// problem reports): returns the in-progress snapshot or the error the
    /// caller turns into a redirect to the daily plan.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoActiveVisit`] when no visit is in progress.
    pub fn require_active(&self) -> Result<ActiveVisitSnapshot, SessionError> {
        self.active_visit()?.ok_or(SessionError::NoActiveVisit)
    }

    /// Saves the in-progress visit: uploads pending evidence, then inserts
    /// the record on first save or updates it on an edit cycle, and marks
    /// the session saved.
    ///
    /// On any failure the session stays in progress and unsaved state is
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`SaveVisitError`] when no visit is in progress, the draft
    /// targets a different customer, evidence uploads fail, or the
    /// repository rejects the write.
    pub async fn save_visit(&self, draft: VisitDraft) -> Result<VisitRecord, SaveVisitError> {
        let active = self.current_session()?.ok_or(SessionError::NoActiveVisit)?;
        if active.customer_id() != draft.customer_id {
            return Err(SaveVisitError::CustomerMismatch {
                draft: draft.customer_id,
                active: active.customer_id(),
            });
        }

        let uploaded = self
            .evidence
            .run(draft.pending_photos)
            .await
            .map_err(Box::new)?;
        let photos = merge_photos(draft.stored_photos, uploaded)?;

        let record = match active.visit_id() {
            None => {
                self.insert_record(&active, draft.outcome, draft.description, photos)
                    .await?
            }
            Some(visit_id) => {
                let mut record = self
                    .visits
                    .find_by_id(visit_id)
                    .await?
                    .ok_or(VisitRepositoryError::NotFound(visit_id))?;
                record.set_outcome(draft.outcome, &*self.clock);
                record.set_description(draft.description, &*self.clock);
                record.set_photos(photos, &*self.clock);
                self.visits.update(&record).await?;
                record
            }
        };

        self.bind_saved(record.id())?;
        Ok(record)
    }

    /// Ends the saved visit: computes the session duration, writes it onto
    /// the stored record, and clears the session.
    ///
    /// If the duration write-back fails the session stays in progress so
    /// the user can retry.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoActiveVisit`] when no visit is in
    /// progress, [`SessionError::UnsavedVisit`] when the visit form has not
    /// been saved, or [`SessionError::Repository`] when the write-back
    /// fails.
    pub async fn end_visit(&self) -> Result<VisitCompletion, SessionError> {
        let active = self.current_session()?.ok_or(SessionError::NoActiveVisit)?;
        if !active.is_saved() {
            return Err(SessionError::UnsavedVisit);
        }
        let completion = active.completion(&*self.clock)?;

        let mut record = self
            .visits
            .find_by_id(completion.visit_id)
            .await?
            .ok_or(VisitRepositoryError::NotFound(completion.visit_id))?;
        record.record_duration(completion.duration, &*self.clock);
        self.visits.update(&record).await?;

        self.clear_session()?;
        Ok(completion)
    }

    fn current_session(&self) -> Result<Option<ActiveVisit>, SessionError> {
        let slot = self
            .session
            .read()
            .map_err(|err| SessionError::StatePoisoned(err.to_string()))?;
        Ok(slot.clone())
    }

    fn bind_saved(&self, visit_id: VisitId) -> Result<(), SaveVisitError> {
        let mut slot = self
            .session
            .write()
            .map_err(|err| SessionError::StatePoisoned(err.to_string()))?;
        let active = slot.as_mut().ok_or(SessionError::NoActiveVisit)?;
        active.mark_saved(visit_id)?;
        Ok(())
    }

    fn clear_session(&self) -> Result<(), SessionError> {
        let mut slot = self
            .session
            .write()
            .map_err(|err| SessionError::StatePoisoned(err.to_string()))?;
        *slot = None;
        Ok(())
    }

    async fn insert_record(
        &self,
        active: &ActiveVisit,
        outcome: VisitOutcome,
        description: Option<String>,
        photos: EvidencePhotos,
    ) -> Result<VisitRecord, SaveVisitError> {
        let record = VisitRecord::new(
            NewVisitData {
                assignee_id: self.config.assignee_id,
                customer_id: active.customer_id(),
                visit_datetime: active.started_at(),
                outcome,
                description,
                photos,
                created_by: self.config.created_by,
            },
            &*self.clock,
        );
        self.visits.store(&record).await?;
        Ok(record)
    }
}

fn merge_photos(
    mut photos: EvidencePhotos,
    uploaded: Vec<UploadedPhoto>,
) -> Result<EvidencePhotos, VisitDomainError> {
    for upload in uploaded {
        photos.push(upload.stage, upload.url)?;
    }
    Ok(photos)
}

//! Visit record aggregate root and outcome types.

use super::{DurationMinutes, VisitDomainError, VisitId};
use crate::directory::domain::{AssigneeId, CustomerId, NoVisitReasonId, UserId, VisitTypeId};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Outcome of a logged visit.
///
/// The original data model stored an `is_visit` flag beside nullable type
/// and reason columns, leaving illegal combinations (a completed visit with
/// no type, a skip with no reason) representable. Here the flag is derived
/// and each variant carries exactly the data it requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VisitOutcome {
    /// The assignee entered the store and performed the visit.
    Completed {
        /// Kind of visit performed (scheduled, cold call, ...).
        visit_type: VisitTypeId,
    },
    /// The assignee reached the store but could not visit it.
    NotVisited {
        /// Catalogue reason the visit did not happen.
        reason: NoVisitReasonId,
        /// Free-text elaboration of the reason, if any.
        description: Option<String>,
    },
}

impl VisitOutcome {
    /// Returns whether the outcome counts as a performed visit.
    #[must_use]
    pub const fn is_visit(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Returns the visit type for completed outcomes.
    #[must_use]
    pub const fn visit_type(&self) -> Option<VisitTypeId> {
        match self {
            Self::Completed { visit_type } => Some(*visit_type),
            Self::NotVisited { .. } => None,
        }
    }

    /// Returns the no-visit reason for skipped outcomes.
    #[must_use]
    pub const fn no_visit_reason(&self) -> Option<NoVisitReasonId> {
        match self {
            Self::Completed { .. } => None,
            Self::NotVisited { reason, .. } => Some(*reason),
        }
    }
}

/// Evidence photo capture stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoStage {
    /// Shelf state before the visit work.
    Before,
    /// Shelf state after the visit work.
    After,
}

impl PhotoStage {
    /// Returns the canonical storage representation, also used as the
    /// object-key prefix in evidence stores.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
        }
    }
}

/// Stored URLs of the evidence photos attached to a visit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidencePhotos {
    before: Vec<String>,
    after: Vec<String>,
}

impl EvidencePhotos {
    /// Creates an empty photo set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            before: Vec::new(),
            after: Vec::new(),
        }
    }

    /// Creates a photo set from stored URL batches.
    ///
    /// # Errors
    ///
    /// Returns [`VisitDomainError::EmptyPhotoUrl`] when any URL is empty
    /// after trimming.
    pub fn from_urls(before: Vec<String>, after: Vec<String>) -> Result<Self, VisitDomainError> {
        let all_valid = before
            .iter()
            .chain(after.iter())
            .all(|url| !url.trim().is_empty());
        if !all_valid {
            return Err(VisitDomainError::EmptyPhotoUrl);
        }
        Ok(Self { before, after })
    }

    /// Appends a stored URL to the given stage.
    ///
    /// # Errors
    ///
    /// Returns [`VisitDomainError::EmptyPhotoUrl`] when the URL is empty
    /// after trimming.
    pub fn push(
        &mut self,
        stage: PhotoStage,
        url: impl Into<String>,
    ) -> Result<(), VisitDomainError> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(VisitDomainError::EmptyPhotoUrl);
        }
        match stage {
            PhotoStage::Before => self.before.push(url),
            PhotoStage::After => self.after.push(url),
        }
        Ok(())
    }

    /// Returns the stored URLs for the given stage.
    #[must_use]
    pub fn urls(&self, stage: PhotoStage) -> &[String] {
        match stage {
            PhotoStage::Before => &self.before,
            PhotoStage::After => &self.after,
        }
    }

    /// Returns the total number of stored URLs across both stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.before.len() + self.after.len()
    }

    /// Returns whether no photos are attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty()
    }
}

/// Visit record aggregate root.
///
/// One record captures one assignee's outcome at one customer on one
/// calendar day; the repository enforces the daily slot uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitRecord {
    id: VisitId,
    assignee_id: AssigneeId,
    customer_id: CustomerId,
    visit_datetime: DateTime<Utc>,
    outcome: VisitOutcome,
    description: Option<String>,
    photos: EvidencePhotos,
    duration_minutes: Option<DurationMinutes>,
    created_by: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for creating a new visit record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVisitData {
    /// Assignee the visit belongs to.
    pub assignee_id: AssigneeId,
    /// Customer the visit was made at.
    pub customer_id: CustomerId,
    /// Instant the visit took place.
    pub visit_datetime: DateTime<Utc>,
    /// Visit outcome.
    pub outcome: VisitOutcome,
    /// Free-text visit notes, if any.
    pub description: Option<String>,
    /// Evidence photos stored for the visit.
    pub photos: EvidencePhotos,
    /// User who logged the visit.
    pub created_by: UserId,
}

/// Parameter object for reconstructing a persisted visit record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedVisitData {
    /// Persisted record identifier.
    pub id: VisitId,
    /// Persisted assignee reference.
    pub assignee_id: AssigneeId,
    /// Persisted customer reference.
    pub customer_id: CustomerId,
    /// Persisted visit instant.
    pub visit_datetime: DateTime<Utc>,
    /// Persisted outcome.
    pub outcome: VisitOutcome,
    /// Persisted visit notes, if any.
    pub description: Option<String>,
    /// Persisted photo URLs.
    pub photos: EvidencePhotos,
    /// Persisted duration, when the visit has been ended.
    pub duration_minutes: Option<DurationMinutes>,
    /// Persisted creator reference.
    pub created_by: UserId,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl VisitRecord {
    /// Creates a new visit record with a fresh identifier.
    #[must_use]
    pub fn new(data: NewVisitData, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: VisitId::new(),
            assignee_id: data.assignee_id,
            customer_id: data.customer_id,
            visit_datetime: data.visit_datetime,
            outcome: data.outcome,
            description: data.description,
            photos: data.photos,
            duration_minutes: None,
            created_by: data.created_by,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a visit record from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedVisitData) -> Self {
        Self {
            id: data.id,
            assignee_id: data.assignee_id,
            customer_id: data.customer_id,
            visit_datetime: data.visit_datetime,
            outcome: data.outcome,
            description: data.description,
            photos: data.photos,
            duration_minutes: data.duration_minutes,
            created_by: data.created_by,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the record identifier.
    #[must_use]
    pub const fn id(&self) -> VisitId {
        self.id
    }

    /// Returns the assignee the visit belongs to.
    #[must_use]
    pub const fn assignee_id(&self) -> AssigneeId {
        self.assignee_id
    }

    /// Returns the customer the visit was made at.
    #[must_use]
    pub const fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Returns the instant the visit took place.
    #[must_use]
    pub const fn visit_datetime(&self) -> DateTime<Utc> {
        self.visit_datetime
    }

    /// Returns the UTC calendar date of the visit.
    ///
    /// This is the date reconciliation joins on; two instants on the same
    /// UTC day occupy the same daily slot.
    #[must_use]
    pub fn visit_date(&self) -> NaiveDate {
        self.visit_datetime.date_naive()
    }

    /// Returns the visit outcome.
    #[must_use]
    pub const fn outcome(&self) -> &VisitOutcome {
        &self.outcome
    }

    /// Returns the free-text visit notes, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the evidence photos stored for the visit.
    #[must_use]
    pub const fn photos(&self) -> &EvidencePhotos {
        &self.photos
    }

    /// Returns the recorded duration, when the visit has been ended.
    #[must_use]
    pub const fn duration_minutes(&self) -> Option<DurationMinutes> {
        self.duration_minutes
    }

    /// Returns the user who logged the visit.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the outcome, as an edit cycle does before re-saving.
    pub fn set_outcome(&mut self, outcome: VisitOutcome, clock: &impl Clock) {
        self.outcome = outcome;
        self.touch(clock);
    }

    /// Replaces the free-text notes.
    pub fn set_description(&mut self, description: Option<String>, clock: &impl Clock) {
        self.description = description;
        self.touch(clock);
    }

    /// Replaces the stored photo set.
    pub fn set_photos(&mut self, photos: EvidencePhotos, clock: &impl Clock) {
        self.photos = photos;
        self.touch(clock);
    }

    /// Records the session duration when the visit ends.
    pub fn record_duration(&mut self, duration: DurationMinutes, clock: &impl Clock) {
        self.duration_minutes = Some(duration);
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

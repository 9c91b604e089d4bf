//! In-progress visit session state.
//!
//! An active visit represents the period between tapping a customer on the
//! daily plan and ending the visit. The original client scattered this state
//! across global mutable fields (current customer, a saved flag, a start
//! timestamp) mutated from several screens; here it is a single value with
//! validated transitions, owned by the session service.

use super::{DurationMinutes, VisitDomainError, VisitId};
use crate::directory::domain::CustomerId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// The one in-progress visit a user may hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveVisit {
    customer_id: CustomerId,
    customer_name: String,
    started_at: DateTime<Utc>,
    visit_id: Option<VisitId>,
    saved: bool,
}

impl ActiveVisit {
    /// Starts a visit session at the current clock time.
    ///
    /// # Errors
    ///
    /// Returns [`VisitDomainError::EmptyCustomerName`] when the name is empty
    /// after trimming.
    pub fn start(
        customer_id: CustomerId,
        customer_name: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, VisitDomainError> {
        let customer_name = customer_name.into();
        let trimmed = customer_name.trim();
        if trimmed.is_empty() {
            return Err(VisitDomainError::EmptyCustomerName);
        }
        Ok(Self {
            customer_id,
            customer_name: trimmed.to_owned(),
            started_at: clock.utc(),
            visit_id: None,
            saved: false,
        })
    }

    /// Returns the customer the session is for.
    #[must_use]
    pub const fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Returns the customer display name captured at session start.
    #[must_use]
    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    /// Returns the instant the session started.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns the stored record the session is bound to, once saved.
    #[must_use]
    pub const fn visit_id(&self) -> Option<VisitId> {
        self.visit_id
    }

    /// Returns whether the visit form has been saved.
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        self.saved
    }

    /// Binds the session to its stored record after a successful save.
    ///
    /// The first save binds the record id; later saves of the same record
    /// (edit cycles) are accepted unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`VisitDomainError::VisitAlreadyBound`] when the session is
    /// already bound to a different record.
    pub fn mark_saved(&mut self, visit_id: VisitId) -> Result<(), VisitDomainError> {
        match self.visit_id {
            Some(bound) if bound != visit_id => Err(VisitDomainError::VisitAlreadyBound {
                bound,
                requested: visit_id,
            }),
            _ => {
                self.visit_id = Some(visit_id);
                self.saved = true;
                Ok(())
            }
        }
    }

    /// Returns the elapsed session time as a recordable duration.
    #[must_use]
    pub fn duration_so_far(&self, clock: &impl Clock) -> DurationMinutes {
        DurationMinutes::from_elapsed(clock.utc() - self.started_at)
    }

    /// Computes the completion outcome without mutating the session.
    ///
    /// # Errors
    ///
    /// Returns [`VisitDomainError::CompletionBeforeSave`] when the visit form
    /// has not been saved yet.
    pub fn completion(&self, clock: &impl Clock) -> Result<VisitCompletion, VisitDomainError> {
        let Some(visit_id) = self.visit_id else {
            return Err(VisitDomainError::CompletionBeforeSave);
        };
        if !self.saved {
            return Err(VisitDomainError::CompletionBeforeSave);
        }
        Ok(VisitCompletion {
            visit_id,
            duration: self.duration_so_far(clock),
        })
    }

    /// Captures a read-only snapshot for handing to views.
    #[must_use]
    pub fn snapshot(&self) -> ActiveVisitSnapshot {
        ActiveVisitSnapshot {
            customer_id: self.customer_id,
            customer_name: self.customer_name.clone(),
            started_at: self.started_at,
            visit_id: self.visit_id,
            saved: self.saved,
        }
    }
}

/// Result of ending a saved visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitCompletion {
    /// Stored record the completed session was bound to.
    pub visit_id: VisitId,
    /// Time on site, rounded to whole minutes with a one-minute floor.
    pub duration: DurationMinutes,
}

/// Read-only view of the in-progress visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveVisitSnapshot {
    /// Customer the session is for.
    pub customer_id: CustomerId,

    /// Customer display name captured at session start.
    pub customer_name: String,

    /// When the session started.
    pub started_at: DateTime<Utc>,

    /// Stored record the session is bound to (None before the first save).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visit_id: Option<VisitId>,

    /// Whether the visit form has been saved.
    pub saved: bool,
}

//! Error types for visit domain validation.

use super::VisitId;
use thiserror::Error;

/// Errors returned while constructing or mutating visit domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VisitDomainError {
    /// The customer display name is empty after trimming.
    #[error("customer name must not be empty")]
    EmptyCustomerName,

    /// The duration is below the one-minute floor.
    #[error("invalid visit duration {0}, expected at least 1 minute")]
    InvalidDuration(i64),

    /// Completion was requested before the visit form was saved.
    #[error("visit has not been saved yet, save the visit form first")]
    CompletionBeforeSave,

    /// The session is already bound to a different stored record.
    #[error("session already bound to visit {bound}, refusing to rebind to {requested}")]
    VisitAlreadyBound {
        /// Record the session was bound to on first save.
        bound: VisitId,
        /// Conflicting record offered by a later save.
        requested: VisitId,
    },

    /// A stored photo URL is empty after trimming.
    #[error("stored photo URLs must not be empty")]
    EmptyPhotoUrl,
}

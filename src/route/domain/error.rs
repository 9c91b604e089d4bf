//! Error types for route domain validation.

use thiserror::Error;

/// Errors returned while constructing route domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RouteDomainError {
    /// The scheduled day is outside the ISO 1..=7 range.
    #[error("invalid scheduled day {0}, expected 1 (Monday) to 7 (Sunday)")]
    InvalidScheduledDay(u8),

    /// A window bound could not be parsed as a calendar date.
    #[error("invalid plan date {value:?}: {message}")]
    InvalidDate {
        /// Raw input that failed to parse.
        value: String,
        /// Parser message describing the fault.
        message: String,
    },

    /// The window spans more days than the reconciliation horizon allows.
    #[error("plan window of {days} days exceeds the {max_days}-day horizon")]
    WindowTooLarge {
        /// Days the window spans.
        days: i64,
        /// Largest span the configuration allows.
        max_days: i64,
    },
}

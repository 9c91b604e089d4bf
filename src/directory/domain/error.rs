//! Error types for directory domain validation.

use thiserror::Error;

/// Errors returned while constructing directory domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryDomainError {
    /// A customer or assignee display name is empty after trimming.
    #[error("display name must not be empty")]
    EmptyDisplayName,
}

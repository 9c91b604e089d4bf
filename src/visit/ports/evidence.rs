//! Storage port for visit evidence photos.

use crate::visit::domain::PhotoStage;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for evidence store operations.
pub type EvidenceStoreResult<T> = Result<T, EvidenceStoreError>;

/// Content-addressed key for one evidence photo object.
///
/// Keys are derived from the photo bytes, so re-uploading the same photo
/// targets the same object and a resumed save re-uses completed uploads
/// instead of duplicating them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey {
    stage: PhotoStage,
    digest_hex: String,
}

impl ObjectKey {
    /// Derives the key for a photo's bytes.
    #[must_use]
    pub fn for_bytes(stage: PhotoStage, bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self {
            stage,
            digest_hex: format!("{:x}", hasher.finalize()),
        }
    }

    /// Returns the capture stage the object belongs to.
    #[must_use]
    pub const fn stage(&self) -> PhotoStage {
        self.stage
    }

    /// Returns the hex-encoded SHA-256 digest of the photo bytes.
    #[must_use]
    pub fn digest_hex(&self) -> &str {
        &self.digest_hex
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.stage.as_str(), self.digest_hex)
    }
}

/// Evidence photo storage contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EvidenceStore: Send + Sync {
    /// Stores a photo under the given key, returning the stored URL.
    ///
    /// Storing the same key twice is permitted and returns the same URL.
    async fn put(&self, key: &ObjectKey, bytes: &[u8]) -> EvidenceStoreResult<String>;

    /// Removes a previously stored photo by its URL.
    ///
    /// # Errors
    ///
    /// Returns [`EvidenceStoreError::NotFound`] when no object is stored
    /// under the URL.
    async fn delete(&self, url: &str) -> EvidenceStoreResult<()>;
}

/// Errors returned by evidence store implementations.
#[derive(Debug, Clone, Error)]
pub enum EvidenceStoreError {
    /// No object is stored under the given URL.
    #[error("no evidence object stored at {0}")]
    NotFound(String),

    /// Storage-layer failure.
    #[error("evidence storage error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl EvidenceStoreError {
    /// Wraps a storage error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}

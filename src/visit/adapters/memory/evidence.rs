//! In-memory evidence store for saga tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::visit::ports::{EvidenceStore, EvidenceStoreError, EvidenceStoreResult, ObjectKey};

/// Thread-safe in-memory evidence photo store.
///
/// Stored URLs use a `mem:` scheme so tests can tell them apart from URLs a
/// real backend would mint.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEvidenceStore {
    objects: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryEvidenceStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether an object is stored under the URL.
    ///
    /// # Errors
    ///
    /// Returns [`EvidenceStoreError::Storage`] when the backing lock is
    /// poisoned.
    pub fn contains(&self, url: &str) -> EvidenceStoreResult<bool> {
        let objects = self.objects.read().map_err(poisoned)?;
        Ok(objects.contains_key(url))
    }

    /// Returns the number of stored objects.
    ///
    /// # Errors
    ///
    /// Returns [`EvidenceStoreError::Storage`] when the backing lock is
    /// poisoned.
    pub fn object_count(&self) -> EvidenceStoreResult<usize> {
        let objects = self.objects.read().map_err(poisoned)?;
        Ok(objects.len())
    }
}

fn poisoned(err: impl std::fmt::Display) -> EvidenceStoreError {
    EvidenceStoreError::storage(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl EvidenceStore for InMemoryEvidenceStore {
    async fn put(&self, key: &ObjectKey, bytes: &[u8]) -> EvidenceStoreResult<String> {
        let url = format!("mem:{key}");
        let mut objects = self.objects.write().map_err(poisoned)?;
        objects.insert(url.clone(), bytes.to_vec());
        Ok(url)
    }

    async fn delete(&self, url: &str) -> EvidenceStoreResult<()> {
        let mut objects = self.objects.write().map_err(poisoned)?;
        if objects.remove(url).is_none() {
            return Err(EvidenceStoreError::NotFound(url.to_owned()));
        }
        Ok(())
    }
}

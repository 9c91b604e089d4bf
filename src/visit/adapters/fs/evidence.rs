//! Filesystem evidence store rooted in a capability directory.

use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::sync::Arc;

use crate::visit::ports::{EvidenceStore, EvidenceStoreError, EvidenceStoreResult, ObjectKey};

/// Evidence photo store writing into a sandboxed local directory.
///
/// Objects live at `<root>/<stage>/<digest>`; stored URLs are `file:`
/// prefixed paths relative to the root, so the store can resolve deletes
/// without ambient filesystem access.
#[derive(Debug, Clone)]
pub struct FsEvidenceStore {
    root: Arc<Dir>,
}

impl FsEvidenceStore {
    /// Opens an evidence store rooted at the given directory path.
    ///
    /// # Errors
    ///
    /// Returns [`EvidenceStoreError::Storage`] when the directory cannot be
    /// opened.
    pub fn open(root: impl AsRef<Utf8Path>) -> EvidenceStoreResult<Self> {
        let dir =
            Dir::open_ambient_dir(root, ambient_authority()).map_err(EvidenceStoreError::storage)?;
        Ok(Self::from_dir(dir))
    }

    /// Creates an evidence store from an already-opened capability directory.
    #[must_use]
    pub fn from_dir(root: Dir) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    async fn run_blocking<F, T>(&self, f: F) -> EvidenceStoreResult<T>
    where
        F: FnOnce(&Dir) -> EvidenceStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let root = Arc::clone(&self.root);
        tokio::task::spawn_blocking(move || f(&root))
            .await
            .map_err(EvidenceStoreError::storage)?
    }
}

#[async_trait]
impl EvidenceStore for FsEvidenceStore {
    async fn put(&self, key: &ObjectKey, bytes: &[u8]) -> EvidenceStoreResult<String> {
        let stage_dir = key.stage().as_str();
        let object_path = key.to_string();
        let url = format!("file:{object_path}");
        let payload = bytes.to_vec();
        self.run_blocking(move |root| {
            root.create_dir_all(stage_dir)
                .map_err(EvidenceStoreError::storage)?;
            root.write(&object_path, &payload)
                .map_err(EvidenceStoreError::storage)
        })
        .await?;
        Ok(url)
    }

    async fn delete(&self, url: &str) -> EvidenceStoreResult<()> {
        let Some(relative) = url.strip_prefix("file:") else {
            return Err(EvidenceStoreError::NotFound(url.to_owned()));
        };
        let object_path = relative.to_owned();
        let stored_url = url.to_owned();
        self.run_blocking(move |root| {
            root.remove_file(&object_path).map_err(|err| {
                if err.kind() == std::io::ErrorKind::NotFound {
                    EvidenceStoreError::NotFound(stored_url.clone())
                } else {
                    EvidenceStoreError::storage(err)
                }
            })
        })
        .await
    }
}

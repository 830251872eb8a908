use super::{validate_blob_path, BlobStore};
use crate::error::StoreError;
use async_trait::async_trait;
use std::path::PathBuf;

/// Stores uploads under a root directory and returns `file://` URLs.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    root: PathBuf,
}

impl FileBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, path: &str) -> Result<PathBuf, StoreError> {
        validate_blob_path(path)?;
        Ok(self.root.join(path))
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, StoreError> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, &bytes).await?;
        log::debug!("stored {} bytes ({content_type}) at {}", bytes.len(), target.display());
        Ok(format!("file://{}", target.display()))
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        let target = self.resolve(path)?;
        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

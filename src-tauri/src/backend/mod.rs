//! Seams over the hosted capabilities the app depends on: a document
//! database, blob storage for photos, and an identity provider.
//!
//! Local implementations live alongside the traits so the app runs fully
//! offline and tests need no network.

pub mod fs_blob;
pub mod identity;
pub mod memory;
pub mod query;
pub mod sqlite;

use crate::error::StoreError;
use async_trait::async_trait;
use serde_json::{Map, Value};

pub use identity::{
    AuthIdentity, FederatedCredential, FederatedProfile, IdentityProvider, LocalIdentityProvider,
    TokenVerifier,
};
pub use query::{Direction, Filter, Query};

/// A stored JSON object and the key it lives under.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Create or replace the document at `collection/id`.
    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError>;

    /// Merge top-level `fields` into an existing document.
    /// Returns `StoreError::NotFound` when the document does not exist.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError>;

    /// Store `data` under a freshly generated id and return that id.
    async fn add(&self, collection: &str, data: Value) -> Result<String, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        self.set(collection, &id, data).await?;
        Ok(id)
    }
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload `bytes` to `path` and return a URL the frontend can load.
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, StoreError>;

    async fn delete(&self, path: &str) -> Result<(), StoreError>;
}

/// `<namespace>/<owner>/<uuid>.<ext>`
pub fn blob_path(namespace: &str, owner: &str, extension: &str) -> String {
    format!("{namespace}/{owner}/{}.{extension}", uuid::Uuid::new_v4())
}

/// Reject absolute paths and parent traversal before a blob path touches a
/// filesystem or URL.
pub fn validate_blob_path(path: &str) -> Result<(), StoreError> {
    let bad = path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || path.split('/').any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if bad {
        return Err(StoreError::Storage(format!("invalid blob path: {path}")));
    }
    Ok(())
}

pub(crate) fn merge_fields(target: &mut Value, fields: Map<String, Value>) -> Result<(), StoreError> {
    let obj = target
        .as_object_mut()
        .ok_or_else(|| StoreError::Serialization("document is not a JSON object".to_string()))?;
    for (key, value) in fields {
        obj.insert(key, value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blob_paths_are_namespaced_per_owner() {
        let path = blob_path("repair_images", "uid-1", "jpg");
        assert!(path.starts_with("repair_images/uid-1/"));
        assert!(path.ends_with(".jpg"));
        assert!(validate_blob_path(&path).is_ok());
    }

    #[test]
    fn traversal_and_absolute_paths_are_rejected() {
        for path in ["", "/etc/passwd", "a/../b", "a//b", "./a", "a\\b"] {
            assert!(validate_blob_path(path).is_err(), "{path} should be rejected");
        }
    }

    #[test]
    fn merge_overwrites_only_given_fields() {
        let mut doc = json!({ "status": "PENDING", "issue": "Broken hinge" });
        let mut fields = Map::new();
        fields.insert("status".to_string(), json!("CANCELLED"));
        merge_fields(&mut doc, fields).unwrap();
        assert_eq!(doc, json!({ "status": "CANCELLED", "issue": "Broken hinge" }));
    }
}

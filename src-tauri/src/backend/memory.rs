use super::{merge_fields, validate_blob_path, BlobStore, Document, DocumentStore, Query};
use crate::error::StoreError;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

type Collections = HashMap<String, BTreeMap<String, Value>>;

/// Process-local document store. Used for previews and tests.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: Mutex<Collections>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self, collection: &str) -> usize {
        self.lock()
            .map(|c| c.get(collection).map_or(0, BTreeMap::len))
            .unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>, StoreError> {
        self.collections
            .lock()
            .map_err(|_| StoreError::Storage("document store lock poisoned".to_string()))
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let collections = self.lock()?;
        Ok(collections.get(collection).and_then(|c| c.get(id)).cloned())
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        let mut collections = self.lock()?;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let mut collections = self.lock()?;
        let doc = collections
            .get_mut(collection)
            .and_then(|c| c.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        merge_fields(doc, fields)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut collections = self.lock()?;
        if let Some(c) = collections.get_mut(collection) {
            c.remove(id);
        }
        Ok(())
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        let docs: Vec<Document> = {
            let collections = self.lock()?;
            collections
                .get(collection)
                .map(|c| {
                    c.iter()
                        .map(|(id, data)| Document {
                            id: id.clone(),
                            data: data.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default()
        };
        Ok(query.apply(docs))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Blob store that keeps uploads in memory and hands out `memory://` URLs.
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    blobs: Mutex<BTreeMap<String, StoredBlob>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<StoredBlob> {
        self.blobs.lock().ok().and_then(|b| b.get(path).cloned())
    }

    pub fn paths(&self) -> Vec<String> {
        self.blobs
            .lock()
            .map(|b| b.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, StoreError> {
        validate_blob_path(path)?;
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| StoreError::Storage("blob store lock poisoned".to_string()))?;
        blobs.insert(
            path.to_string(),
            StoredBlob {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(format!("memory://{path}"))
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| StoreError::Storage("blob store lock poisoned".to_string()))?;
        blobs.remove(path);
        Ok(())
    }
}

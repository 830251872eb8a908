use super::{decode, decode_all, encode, now_millis, REPAIR_IMAGES, REPAIR_REQUESTS};
use crate::backend::{blob_path, BlobStore, Direction, DocumentStore, IdentityProvider, Query};
use crate::error::ServiceError;
use crate::models::image::ImageSource;
use crate::models::repair_request::{RepairRequest, RepairRequestDraft, RepairStatus};
use crate::validation::validate_booking;
use serde_json::{json, Map};
use std::sync::Arc;

const NOT_FOUND: &str = "Repair request not found";

pub struct RepairRequestRepository {
    identity: Arc<dyn IdentityProvider>,
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
}

impl RepairRequestRepository {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        documents: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            identity,
            documents,
            blobs,
        }
    }

    /// Validate, upload every image in order, then write the request.
    ///
    /// Uploads run one at a time; the first failure aborts the submission
    /// and nothing is written to the document store.
    pub async fn create(
        &self,
        draft: RepairRequestDraft,
        images: &[ImageSource],
    ) -> Result<RepairRequest, ServiceError> {
        validate_booking(&draft)?;
        let uid = self
            .identity
            .current()
            .ok_or(ServiceError::NotAuthenticated)?
            .uid;

        let mut urls = Vec::with_capacity(images.len());
        for (index, image) in images.iter().enumerate() {
            let url = self.upload_image(&uid, image).await?;
            log::debug!("uploaded image {}/{} for {uid}", index + 1, images.len());
            urls.push(url);
        }

        let id = uuid::Uuid::new_v4().to_string();
        let request = draft.into_request(id, uid, urls, now_millis());
        self.documents
            .set(REPAIR_REQUESTS, &request.id, encode(&request)?)
            .await?;

        log::info!(
            "repair request {} created with {} image(s)",
            request.id,
            request.images.len()
        );
        Ok(request)
    }

    async fn upload_image(&self, uid: &str, image: &ImageSource) -> Result<String, ServiceError> {
        let bytes = image.read().await?;
        let path = blob_path(REPAIR_IMAGES, uid, image.extension());
        self.blobs
            .put(&path, bytes, image.content_type())
            .await
            .map_err(|e| {
                log::warn!("upload of {} failed: {e}", image.describe());
                ServiceError::Upload(e)
            })
    }

    /// The signed-in user's requests, newest first.
    pub async fn list_for_current_user(&self) -> Result<Vec<RepairRequest>, ServiceError> {
        let uid = self
            .identity
            .current()
            .ok_or(ServiceError::NotAuthenticated)?
            .uid;

        let query = Query::new()
            .where_eq("userId", uid)
            .order_by("createdAt", Direction::Descending);
        let docs = self.documents.query(REPAIR_REQUESTS, &query).await?;
        Ok(decode_all(REPAIR_REQUESTS, docs))
    }

    pub async fn get(&self, request_id: &str) -> Result<RepairRequest, ServiceError> {
        let data = self
            .documents
            .get(REPAIR_REQUESTS, request_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.to_string()))?;
        Ok(decode(request_id, data)?)
    }

    pub async fn update_status(
        &self,
        request_id: &str,
        status: RepairStatus,
    ) -> Result<(), ServiceError> {
        let mut fields = Map::new();
        fields.insert("status".to_string(), json!(status));
        self.documents
            .update(REPAIR_REQUESTS, request_id, fields)
            .await
            .map_err(|e| ServiceError::not_found_as(e, NOT_FOUND))?;
        log::info!("repair request {request_id} moved to {status:?}");
        Ok(())
    }

    pub async fn cancel(&self, request_id: &str) -> Result<(), ServiceError> {
        let mut fields = Map::new();
        fields.insert("status".to_string(), json!(RepairStatus::Cancelled));
        fields.insert("cancelledAt".to_string(), json!(now_millis()));
        self.documents
            .update(REPAIR_REQUESTS, request_id, fields)
            .await
            .map_err(|e| ServiceError::not_found_as(e, NOT_FOUND))?;
        log::info!("repair request {request_id} cancelled");
        Ok(())
    }
}

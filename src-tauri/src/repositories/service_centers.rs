use super::{decode, decode_all, SERVICE_CENTERS};
use crate::backend::{Direction, DocumentStore, Query};
use crate::error::ServiceError;
use crate::models::service_center::ServiceCenter;
use std::sync::Arc;

pub struct ServiceCenterRepository {
    documents: Arc<dyn DocumentStore>,
}

impl ServiceCenterRepository {
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    /// Best rated first.
    pub async fn list(&self) -> Result<Vec<ServiceCenter>, ServiceError> {
        let query = Query::new().order_by("rating", Direction::Descending);
        let docs = self.documents.query(SERVICE_CENTERS, &query).await?;
        Ok(decode_all(SERVICE_CENTERS, docs))
    }

    pub async fn by_category(&self, category: &str) -> Result<Vec<ServiceCenter>, ServiceError> {
        let query = Query::new()
            .where_array_contains("categories", category)
            .order_by("rating", Direction::Descending);
        let docs = self.documents.query(SERVICE_CENTERS, &query).await?;
        Ok(decode_all(SERVICE_CENTERS, docs))
    }

    pub async fn get(&self, center_id: &str) -> Result<ServiceCenter, ServiceError> {
        let data = self
            .documents
            .get(SERVICE_CENTERS, center_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Service center not found".to_string()))?;
        Ok(decode(center_id, data)?)
    }
}

use super::{decode, decode_all, TECHNICIANS};
use crate::backend::{Direction, DocumentStore, Query};
use crate::error::ServiceError;
use crate::models::technician::Technician;
use std::sync::Arc;

pub struct TechnicianRepository {
    documents: Arc<dyn DocumentStore>,
}

impl TechnicianRepository {
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    pub async fn list(&self) -> Result<Vec<Technician>, ServiceError> {
        let query = Query::new().order_by("rating", Direction::Descending);
        let docs = self.documents.query(TECHNICIANS, &query).await?;
        Ok(decode_all(TECHNICIANS, docs))
    }

    pub async fn by_specialization(&self, specialization: &str) -> Result<Vec<Technician>, ServiceError> {
        let query = Query::new()
            .where_array_contains("specializations", specialization)
            .order_by("rating", Direction::Descending);
        let docs = self.documents.query(TECHNICIANS, &query).await?;
        Ok(decode_all(TECHNICIANS, docs))
    }

    pub async fn get(&self, technician_id: &str) -> Result<Technician, ServiceError> {
        let data = self
            .documents
            .get(TECHNICIANS, technician_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Technician not found".to_string()))?;
        Ok(decode(technician_id, data)?)
    }
}

use crate::error::ServiceError;
use crate::models::service_center::ServiceCenter;
use crate::models::technician::Technician;
use crate::repositories::service_centers::ServiceCenterRepository;
use crate::repositories::technicians::TechnicianRepository;
use std::sync::Arc;

/// Service center and technician browsing.
pub struct CatalogSession {
    centers: Arc<ServiceCenterRepository>,
    technicians: Arc<TechnicianRepository>,
}

impl CatalogSession {
    pub fn new(centers: Arc<ServiceCenterRepository>, technicians: Arc<TechnicianRepository>) -> Self {
        Self {
            centers,
            technicians,
        }
    }

    pub async fn load_service_centers(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<ServiceCenter>, ServiceError> {
        match category {
            Some(category) => self.centers.by_category(category).await,
            None => self.centers.list().await,
        }
    }

    pub async fn load_technicians(
        &self,
        specialization: Option<&str>,
    ) -> Result<Vec<Technician>, ServiceError> {
        match specialization {
            Some(specialization) => self.technicians.by_specialization(specialization).await,
            None => self.technicians.list().await,
        }
    }

    pub async fn service_center(&self, center_id: &str) -> Result<ServiceCenter, ServiceError> {
        self.centers.get(center_id).await
    }

    pub async fn technician(&self, technician_id: &str) -> Result<Technician, ServiceError> {
        self.technicians.get(technician_id).await
    }
}

use crate::error::ServiceError;
use crate::models::repair_request::RepairRequest;
use crate::repositories::repair_requests::RepairRequestRepository;
use std::sync::Arc;

/// "My repairs": the signed-in user's requests, newest first.
pub struct RepairHistorySession {
    repairs: Arc<RepairRequestRepository>,
}

impl RepairHistorySession {
    pub fn new(repairs: Arc<RepairRequestRepository>) -> Self {
        Self { repairs }
    }

    pub async fn load(&self) -> Result<Vec<RepairRequest>, ServiceError> {
        self.repairs.list_for_current_user().await
    }

    pub async fn get(&self, request_id: &str) -> Result<RepairRequest, ServiceError> {
        self.repairs.get(request_id).await
    }

    /// Cancel, then refresh the list.
    pub async fn cancel(&self, request_id: &str) -> Result<Vec<RepairRequest>, ServiceError> {
        self.repairs.cancel(request_id).await?;
        self.load().await
    }
}

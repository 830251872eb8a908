use crate::error::ServiceError;
use crate::models::repair_request::RepairRequest;
use crate::models::user::User;
use crate::repositories::repair_requests::RepairRequestRepository;
use crate::repositories::users::UserRepository;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub user: User,
    pub recent_repairs: Vec<RepairRequest>,
}

pub struct DashboardSession {
    users: Arc<UserRepository>,
    repairs: Arc<RepairRequestRepository>,
}

impl DashboardSession {
    pub fn new(users: Arc<UserRepository>, repairs: Arc<RepairRequestRepository>) -> Self {
        Self { users, repairs }
    }

    /// Greeting data plus the `recent_limit` newest repair requests.
    pub async fn load(&self, recent_limit: usize) -> Result<Dashboard, ServiceError> {
        let user = self.users.current().await?;
        let mut recent_repairs = self.repairs.list_for_current_user().await?;
        recent_repairs.truncate(recent_limit);
        Ok(Dashboard {
            user,
            recent_repairs,
        })
    }
}

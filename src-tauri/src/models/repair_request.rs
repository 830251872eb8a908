use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepairStatus {
    #[default]
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepairRequest {
    pub id: String,
    pub user_id: String,
    pub device_type: String,
    pub device_model: String,
    pub issue: String,
    pub images: Vec<String>,
    /// Epoch millis of the chosen day; 0 means no date was picked.
    pub scheduled_date: i64,
    /// `HH:MM`, 24-hour clock.
    pub scheduled_time: String,
    pub status: RepairStatus,
    pub technician_id: String,
    pub service_center_id: String,
    pub estimated_cost: f64,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<i64>,
}

/// What the booking screen collects before anything is uploaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepairRequestDraft {
    pub service_center_id: String,
    pub device_type: String,
    pub device_model: String,
    pub issue: String,
    pub scheduled_date: i64,
    pub scheduled_time: String,
}

impl RepairRequestDraft {
    pub fn into_request(
        self,
        id: String,
        user_id: String,
        images: Vec<String>,
        created_at: i64,
    ) -> RepairRequest {
        RepairRequest {
            id,
            user_id,
            device_type: self.device_type,
            device_model: self.device_model,
            issue: self.issue,
            images,
            scheduled_date: self.scheduled_date,
            scheduled_time: self.scheduled_time,
            status: RepairStatus::Pending,
            technician_id: String::new(),
            service_center_id: self.service_center_id,
            estimated_cost: 0.0,
            created_at,
            cancelled_at: None,
        }
    }
}

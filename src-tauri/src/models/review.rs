use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Review {
    pub id: String,
    pub user_id: String,
    pub technician_id: String,
    pub repair_request_id: String,
    pub rating: f32,
    pub comment: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewDraft {
    pub technician_id: String,
    pub repair_request_id: String,
    pub rating: f32,
    pub comment: String,
}

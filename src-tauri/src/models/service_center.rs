use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceCenter {
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub phone: String,
    pub rating: f32,
    pub review_count: u32,
    pub services: Vec<CenterService>,
    pub categories: Vec<String>,
    pub technicians: Vec<String>,
    pub working_hours: CenterHours,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CenterHours {
    pub open_time: String,
    pub close_time: String,
    /// ISO weekdays, Monday = 1, Sunday = 7.
    pub days_open: Vec<u8>,
}

impl Default for CenterHours {
    fn default() -> Self {
        Self {
            open_time: "08:00".to_string(),
            close_time: "20:00".to_string(),
            days_open: vec![1, 2, 3, 4, 5, 6],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CenterService {
    pub id: String,
    pub name: String,
    pub description: String,
    pub base_price: f64,
    pub device_types: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hours_default_to_monday_through_saturday() {
        let center: ServiceCenter = serde_json::from_value(json!({ "name": "Fix-It" })).unwrap();
        assert_eq!(center.working_hours.open_time, "08:00");
        assert_eq!(center.working_hours.close_time, "20:00");
        assert_eq!(center.working_hours.days_open, vec![1u8, 2, 3, 4, 5, 6]);
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Technician {
    pub id: String,
    pub name: String,
    pub profile_image: String,
    pub specializations: Vec<String>,
    /// Years in the trade.
    pub experience: u32,
    pub completed_jobs: u32,
    pub rating: f32,
    pub review_count: u32,
    pub location: String,
    pub working_hours: TechnicianHours,
    pub services: Vec<TechnicianService>,
    pub price_range: PriceRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicianHours {
    pub start: String,
    pub end: String,
}

impl Default for TechnicianHours {
    fn default() -> Self {
        Self {
            start: "08:00".to_string(),
            end: "20:00".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TechnicianService {
    pub name: String,
    pub description: String,
    pub base_price: f64,
}

/// Quoted price band in IDR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: 200_000.0,
            max: 2_000_000.0,
        }
    }
}

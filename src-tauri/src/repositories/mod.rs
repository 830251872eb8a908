//! Typed access to each collection, on top of the backend traits.

pub mod auth;
pub mod repair_requests;
pub mod reviews;
pub mod service_centers;
pub mod technicians;
pub mod users;

use crate::backend::Document;
use crate::error::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub const USERS: &str = "users";
pub const REPAIR_REQUESTS: &str = "repair_requests";
pub const SERVICE_CENTERS: &str = "service_centers";
pub const TECHNICIANS: &str = "technicians";
pub const REVIEWS: &str = "reviews";

pub const REPAIR_IMAGES: &str = "repair_images";
pub const PROFILE_IMAGES: &str = "profile_images";

pub(crate) fn encode<T: Serialize>(record: &T) -> Result<Value, StoreError> {
    Ok(serde_json::to_value(record)?)
}

/// Decode a stored body, taking the record id from the document key.
pub(crate) fn decode<T: DeserializeOwned>(id: &str, mut data: Value) -> Result<T, StoreError> {
    if let Some(obj) = data.as_object_mut() {
        obj.insert("id".to_string(), Value::String(id.to_string()));
    }
    Ok(serde_json::from_value(data)?)
}

/// Decode query results, skipping (and logging) documents that no longer
/// match the record shape.
pub(crate) fn decode_all<T: DeserializeOwned>(collection: &str, docs: Vec<Document>) -> Vec<T> {
    docs.into_iter()
        .filter_map(|doc| match decode::<T>(&doc.id, doc.data) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("skipping malformed {collection}/{}: {e}", doc.id);
                None
            }
        })
        .collect()
}

pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::technician::Technician;
    use serde_json::json;

    #[test]
    fn decode_takes_id_from_document_key() {
        let tech: Technician = decode("t-9", json!({ "id": "stale", "name": "Agus" })).unwrap();
        assert_eq!(tech.id, "t-9");
        assert_eq!(tech.name, "Agus");
    }

    #[test]
    fn decode_all_skips_malformed_documents() {
        let docs = vec![
            Document {
                id: "ok".to_string(),
                data: json!({ "name": "Agus", "rating": 4.5 }),
            },
            Document {
                id: "bad".to_string(),
                data: json!({ "rating": "five stars" }),
            },
        ];
        let techs: Vec<Technician> = decode_all(TECHNICIANS, docs);
        assert_eq!(techs.len(), 1);
        assert_eq!(techs[0].id, "ok");
    }
}

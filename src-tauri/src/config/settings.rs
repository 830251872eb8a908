use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

const SETTINGS_SCHEMA_VERSION: i64 = 2;
const SETTINGS_FILE: &str = "settings.json";

pub const DEFAULT_SUPPORT_WHATSAPP: &str = "6281234567890";
pub const DEFAULT_SUPPORT_MESSAGE: &str = "Hi, I would like to inquire about my service request.";
pub const DEFAULT_RECENT_REPAIRS_LIMIT: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveSettings {
    pub is_first_launch: bool,
    pub support_whatsapp: String,
    pub support_message: String,
    pub recent_repairs_limit: usize,
}

pub fn load_effective_settings(data_dir: &Path) -> Result<EffectiveSettings, String> {
    let settings = load_settings_from_disk(data_dir)?;
    Ok(effective_settings(&settings))
}

fn effective_settings(settings: &Value) -> EffectiveSettings {
    EffectiveSettings {
        is_first_launch: settings
            .get("isFirstLaunch")
            .and_then(Value::as_bool)
            .unwrap_or(true),
        support_whatsapp: settings
            .get("supportWhatsapp")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_SUPPORT_WHATSAPP)
            .to_string(),
        support_message: settings
            .get("supportMessage")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_SUPPORT_MESSAGE)
            .to_string(),
        recent_repairs_limit: settings
            .get("recentRepairsLimit")
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_RECENT_REPAIRS_LIMIT)
            .clamp(1, 20) as usize,
    }
}

pub fn load_settings_from_disk(data_dir: &Path) -> Result<Value, String> {
    let path = settings_path(data_dir);
    ensure_data_dir(data_dir)?;

    let original = if path.exists() {
        let raw = fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read settings.json: {e}"))?;
        serde_json::from_str::<Value>(&raw).unwrap_or_else(|e| {
            log::warn!("settings.json is not valid JSON, starting from defaults: {e}");
            json!({})
        })
    } else {
        json!({})
    };

    let migrated = migrate_settings(original.clone());
    if migrated != original || !path.exists() {
        write_settings_file(&path, &migrated)?;
    }

    Ok(migrated)
}

pub fn save_settings_to_disk(data_dir: &Path, settings: Value) -> Result<Value, String> {
    let path = settings_path(data_dir);
    ensure_data_dir(data_dir)?;

    let mut merged = load_settings_from_disk(data_dir).unwrap_or_else(|_| default_settings());
    merge_settings(&mut merged, &settings);

    let migrated = migrate_settings(merged);
    write_settings_file(&path, &migrated)?;
    Ok(migrated)
}

/// Onboarding is shown once; afterwards launch goes to the welcome screen.
pub fn complete_onboarding(data_dir: &Path) -> Result<Value, String> {
    save_settings_to_disk(data_dir, json!({ "isFirstLaunch": false }))
}

/// `https://wa.me/<number>?text=<message>` for the configured support line.
pub fn support_link(settings: &EffectiveSettings) -> String {
    format!(
        "https://wa.me/{}?text={}",
        settings.support_whatsapp,
        urlencoding::encode(&settings.support_message)
    )
}

fn settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SETTINGS_FILE)
}

fn ensure_data_dir(data_dir: &Path) -> Result<(), String> {
    fs::create_dir_all(data_dir).map_err(|e| format!("Failed to create data directory: {e}"))
}

fn write_settings_file(path: &Path, settings: &Value) -> Result<(), String> {
    let raw = serde_json::to_string_pretty(settings)
        .map_err(|e| format!("Failed to serialize settings: {e}"))?;
    fs::write(path, raw).map_err(|e| format!("Failed to write settings.json: {e}"))
}

fn migrate_settings(input: Value) -> Value {
    let mut out = match input {
        Value::Object(map) => Value::Object(map),
        _ => Value::Object(Map::new()),
    };

    let version = out
        .get("schema_version")
        .and_then(Value::as_i64)
        .unwrap_or(0);

    if version < 1 {
        // Unversioned files came from the old preferences store.
        rename_key(&mut out, "firstLaunch", "isFirstLaunch");
        rename_key(&mut out, "whatsappNumber", "supportWhatsapp");
    }

    if version < 2 {
        ensure_key(&mut out, "recentRepairsLimit", json!(DEFAULT_RECENT_REPAIRS_LIMIT));
    }

    deep_merge_defaults(&mut out, &default_settings());
    sanitize_settings(&mut out);
    if let Some(obj) = out.as_object_mut() {
        obj.insert("schema_version".to_string(), json!(SETTINGS_SCHEMA_VERSION));
    }

    out
}

fn default_settings() -> Value {
    json!({
        "schema_version": SETTINGS_SCHEMA_VERSION,
        "isFirstLaunch": true,
        "supportWhatsapp": DEFAULT_SUPPORT_WHATSAPP,
        "supportMessage": DEFAULT_SUPPORT_MESSAGE,
        "recentRepairsLimit": DEFAULT_RECENT_REPAIRS_LIMIT
    })
}

fn deep_merge_defaults(target: &mut Value, defaults: &Value) {
    let (Some(target_obj), Some(default_obj)) = (target.as_object_mut(), defaults.as_object()) else {
        return;
    };

    for (key, default_value) in default_obj {
        match target_obj.get_mut(key) {
            Some(existing) => {
                if existing.is_object() && default_value.is_object() {
                    deep_merge_defaults(existing, default_value);
                }
            }
            None => {
                target_obj.insert(key.clone(), default_value.clone());
            }
        }
    }
}

fn ensure_key(target: &mut Value, key: &str, value: Value) {
    if let Some(obj) = target.as_object_mut() {
        obj.entry(key.to_string()).or_insert(value);
    }
}

fn rename_key(target: &mut Value, from: &str, to: &str) {
    let Some(obj) = target.as_object_mut() else {
        return;
    };
    if let Some(value) = obj.remove(from) {
        obj.entry(to.to_string()).or_insert(value);
    }
}

fn merge_settings(target: &mut Value, incoming: &Value) {
    match (target, incoming) {
        (Value::Object(target_obj), Value::Object(incoming_obj)) => {
            for (key, value) in incoming_obj {
                if let Some(existing) = target_obj.get_mut(key) {
                    merge_settings(existing, value);
                } else {
                    target_obj.insert(key.clone(), value.clone());
                }
            }
        }
        (target_slot, incoming_value) => {
            *target_slot = incoming_value.clone();
        }
    }
}

fn sanitize_settings(settings: &mut Value) {
    let Some(obj) = settings.as_object_mut() else {
        return;
    };

    clamp_u64(obj, "recentRepairsLimit", 1, 20, DEFAULT_RECENT_REPAIRS_LIMIT);
    ensure_bool(obj, "isFirstLaunch", true);
    sanitize_whatsapp(obj);
    ensure_non_empty_str(obj, "supportMessage", DEFAULT_SUPPORT_MESSAGE);
}

fn clamp_u64(map: &mut Map<String, Value>, key: &str, min: u64, max: u64, default: u64) {
    let raw = map.get(key).and_then(Value::as_u64).unwrap_or(default);
    map.insert(key.to_string(), json!(raw.clamp(min, max)));
}

fn ensure_bool(map: &mut Map<String, Value>, key: &str, default: bool) {
    let value = map.get(key).and_then(Value::as_bool).unwrap_or(default);
    map.insert(key.to_string(), json!(value));
}

fn ensure_non_empty_str(map: &mut Map<String, Value>, key: &str, default: &str) {
    let value = map
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(default)
        .to_string();
    map.insert(key.to_string(), json!(value));
}

/// wa.me wants the international form without `+`, so `0812…` becomes
/// `62812…`.
fn sanitize_whatsapp(map: &mut Map<String, Value>) {
    let digits: String = map
        .get("supportWhatsapp")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();

    let number = if digits.is_empty() {
        DEFAULT_SUPPORT_WHATSAPP.to_string()
    } else if let Some(rest) = digits.strip_prefix('0') {
        format!("62{rest}")
    } else {
        digits
    };
    map.insert("supportWhatsapp".to_string(), json!(number));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrates_legacy_preference_keys() {
        let migrated = migrate_settings(json!({
            "firstLaunch": false,
            "whatsappNumber": "0812-9999-0000"
        }));

        assert_eq!(migrated["isFirstLaunch"], json!(false));
        assert_eq!(migrated["supportWhatsapp"], json!("6281299990000"));
        assert_eq!(migrated["recentRepairsLimit"], json!(5));
        assert!(migrated.get("firstLaunch").is_none());
        assert_eq!(migrated["schema_version"], json!(SETTINGS_SCHEMA_VERSION));
    }

    #[test]
    fn merges_partial_settings_without_losing_existing_values() {
        let mut existing = default_settings();
        merge_settings(&mut existing, &json!({ "recentRepairsLimit": 8 }));
        let migrated = migrate_settings(existing);

        assert_eq!(migrated["recentRepairsLimit"], json!(8));
        assert_eq!(migrated["supportMessage"], json!(DEFAULT_SUPPORT_MESSAGE));
        assert_eq!(migrated["isFirstLaunch"], json!(true));
    }

    #[test]
    fn clamps_and_repairs_bad_values() {
        let migrated = migrate_settings(json!({
            "schema_version": 2,
            "recentRepairsLimit": 500,
            "isFirstLaunch": "yes",
            "supportMessage": "   "
        }));

        assert_eq!(migrated["recentRepairsLimit"], json!(20));
        assert_eq!(migrated["isFirstLaunch"], json!(true));
        assert_eq!(migrated["supportMessage"], json!(DEFAULT_SUPPORT_MESSAGE));
    }

    #[test]
    fn support_link_encodes_message() {
        let settings = effective_settings(&default_settings());
        assert_eq!(
            support_link(&settings),
            "https://wa.me/6281234567890?text=Hi%2C%20I%20would%20like%20to%20inquire%20about%20my%20service%20request."
        );
    }
}

use crate::config::settings::{
    complete_onboarding as mark_onboarding_complete, load_settings_from_disk, save_settings_to_disk,
    support_link,
};
use crate::context::AppContext;
use serde_json::Value;
#[cfg(feature = "app")]
use std::sync::Arc;

pub fn get_settings_internal(ctx: &AppContext) -> Result<Value, String> {
    load_settings_from_disk(ctx.data_dir())
}

/// Merge `settings` into the stored file; unknown keys are kept.
pub fn save_settings_internal(ctx: &AppContext, settings: Value) -> Result<Value, String> {
    save_settings_to_disk(ctx.data_dir(), settings)
}

pub fn complete_onboarding_internal(ctx: &AppContext) -> Result<Value, String> {
    mark_onboarding_complete(ctx.data_dir())
}

pub fn support_link_internal(ctx: &AppContext) -> Result<String, String> {
    Ok(support_link(&ctx.settings()?))
}

#[cfg(feature = "app")]
#[tauri::command]
pub async fn get_settings(ctx: tauri::State<'_, Arc<AppContext>>) -> Result<Value, String> {
    get_settings_internal(ctx.inner())
}

#[cfg(feature = "app")]
#[tauri::command]
pub async fn save_settings(ctx: tauri::State<'_, Arc<AppContext>>, settings: Value) -> Result<Value, String> {
    save_settings_internal(ctx.inner(), settings)
}

#[cfg(feature = "app")]
#[tauri::command]
pub async fn complete_onboarding(ctx: tauri::State<'_, Arc<AppContext>>) -> Result<Value, String> {
    complete_onboarding_internal(ctx.inner())
}

/// Open the support chat in WhatsApp (or the browser when it is missing).
#[cfg(feature = "app")]
#[tauri::command]
pub async fn open_support_chat(
    app: tauri::AppHandle,
    ctx: tauri::State<'_, Arc<AppContext>>,
) -> Result<String, String> {
    use tauri_plugin_opener::OpenerExt;

    let link = support_link_internal(ctx.inner())?;
    app.opener()
        .open_url(link.as_str(), None::<&str>)
        .map_err(|e| format!("Failed to open support chat: {e}"))?;
    Ok(link)
}

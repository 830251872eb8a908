use crate::context::AppContext;
use crate::models::repair_request::RepairRequest;
#[cfg(feature = "app")]
use std::sync::Arc;

pub async fn list_repair_requests_internal(ctx: &AppContext) -> Result<Vec<RepairRequest>, String> {
    ctx.history.load().await.map_err(|e| e.to_string())
}

pub async fn get_repair_request_internal(ctx: &AppContext, request_id: &str) -> Result<RepairRequest, String> {
    ctx.history.get(request_id).await.map_err(|e| e.to_string())
}

pub async fn cancel_repair_request_internal(
    ctx: &AppContext,
    request_id: &str,
) -> Result<Vec<RepairRequest>, String> {
    ctx.history
        .cancel(request_id)
        .await
        .map_err(|e| format!("Cancel error: {e}"))
}

#[cfg(feature = "app")]
#[tauri::command]
pub async fn list_repair_requests(
    ctx: tauri::State<'_, Arc<AppContext>>,
) -> Result<Vec<RepairRequest>, String> {
    list_repair_requests_internal(ctx.inner()).await
}

#[cfg(feature = "app")]
#[tauri::command]
pub async fn get_repair_request(
    ctx: tauri::State<'_, Arc<AppContext>>,
    request_id: String,
) -> Result<RepairRequest, String> {
    get_repair_request_internal(ctx.inner(), &request_id).await
}

#[cfg(feature = "app")]
#[tauri::command]
pub async fn cancel_repair_request(
    ctx: tauri::State<'_, Arc<AppContext>>,
    request_id: String,
) -> Result<Vec<RepairRequest>, String> {
    cancel_repair_request_internal(ctx.inner(), &request_id).await
}

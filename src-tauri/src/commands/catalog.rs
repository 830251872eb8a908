use crate::context::AppContext;
use crate::models::service_center::ServiceCenter;
use crate::models::technician::Technician;
#[cfg(feature = "app")]
use std::sync::Arc;

pub async fn list_service_centers_internal(
    ctx: &AppContext,
    category: Option<&str>,
) -> Result<Vec<ServiceCenter>, String> {
    ctx.catalog
        .load_service_centers(category)
        .await
        .map_err(|e| format!("Service center query error: {e}"))
}

pub async fn get_service_center_internal(ctx: &AppContext, center_id: &str) -> Result<ServiceCenter, String> {
    ctx.catalog
        .service_center(center_id)
        .await
        .map_err(|e| e.to_string())
}

pub async fn list_technicians_internal(
    ctx: &AppContext,
    specialization: Option<&str>,
) -> Result<Vec<Technician>, String> {
    ctx.catalog
        .load_technicians(specialization)
        .await
        .map_err(|e| format!("Technician query error: {e}"))
}

pub async fn get_technician_internal(ctx: &AppContext, technician_id: &str) -> Result<Technician, String> {
    ctx.catalog
        .technician(technician_id)
        .await
        .map_err(|e| e.to_string())
}

#[cfg(feature = "app")]
#[tauri::command]
pub async fn list_service_centers(
    ctx: tauri::State<'_, Arc<AppContext>>,
    category: Option<String>,
) -> Result<Vec<ServiceCenter>, String> {
    list_service_centers_internal(ctx.inner(), category.as_deref()).await
}

#[cfg(feature = "app")]
#[tauri::command]
pub async fn get_service_center(
    ctx: tauri::State<'_, Arc<AppContext>>,
    center_id: String,
) -> Result<ServiceCenter, String> {
    get_service_center_internal(ctx.inner(), &center_id).await
}

#[cfg(feature = "app")]
#[tauri::command]
pub async fn list_technicians(
    ctx: tauri::State<'_, Arc<AppContext>>,
    specialization: Option<String>,
) -> Result<Vec<Technician>, String> {
    list_technicians_internal(ctx.inner(), specialization.as_deref()).await
}

#[cfg(feature = "app")]
#[tauri::command]
pub async fn get_technician(
    ctx: tauri::State<'_, Arc<AppContext>>,
    technician_id: String,
) -> Result<Technician, String> {
    get_technician_internal(ctx.inner(), &technician_id).await
}

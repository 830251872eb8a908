use crate::context::AppContext;
use crate::state::dashboard::Dashboard;
#[cfg(feature = "app")]
use std::sync::Arc;

/// Recent-request count comes from `recentRepairsLimit`.
pub async fn load_dashboard_internal(ctx: &AppContext) -> Result<Dashboard, String> {
    let limit = ctx.settings()?.recent_repairs_limit;
    ctx.dashboard
        .load(limit)
        .await
        .map_err(|e| format!("Dashboard error: {e}"))
}

#[cfg(feature = "app")]
#[tauri::command]
pub async fn load_dashboard(ctx: tauri::State<'_, Arc<AppContext>>) -> Result<Dashboard, String> {
    load_dashboard_internal(ctx.inner()).await
}

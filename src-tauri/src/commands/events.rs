use crate::context::AppContext;
use serde::Serialize;
use std::sync::Arc;
use tauri::{AppHandle, Emitter};
use tokio::sync::watch;

pub const SUBMISSION_STATE: &str = "submission_state";
pub const PROFILE_STATE: &str = "profile_state";
pub const AUTH_STATE: &str = "auth_state";

/// Push every session state change to the webview.
pub fn spawn_state_forwarders(app: &AppHandle, ctx: &Arc<AppContext>) {
    forward(app.clone(), SUBMISSION_STATE, ctx.booking.state().subscribe());
    forward(app.clone(), PROFILE_STATE, ctx.profile.state().subscribe());
    forward(app.clone(), AUTH_STATE, ctx.auth.state().subscribe());
}

fn forward<S>(app: AppHandle, event: &'static str, mut rx: watch::Receiver<S>)
where
    S: Clone + Serialize + Send + Sync + 'static,
{
    tauri::async_runtime::spawn(async move {
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            if let Err(e) = app.emit(event, state) {
                log::warn!("failed to emit {event}: {e}");
            }
        }
        log::debug!("{event} publisher closed");
    });
}

use crate::backend::FederatedCredential;
use crate::context::AppContext;
use crate::models::user::{SignUpForm, User};
#[cfg(feature = "app")]
use {crate::state::UiState, std::sync::Arc};

pub async fn sign_in_internal(ctx: &AppContext, email: &str, password: &str) -> Result<User, String> {
    ctx.auth
        .sign_in(email, password)
        .await
        .map_err(|e| e.to_string())
}

pub async fn sign_up_internal(ctx: &AppContext, form: &SignUpForm) -> Result<User, String> {
    ctx.auth.sign_up(form).await.map_err(|e| e.to_string())
}

pub async fn sign_in_with_credential_internal(
    ctx: &AppContext,
    credential: &FederatedCredential,
) -> Result<User, String> {
    ctx.auth
        .sign_in_with_credential(credential)
        .await
        .map_err(|e| e.to_string())
}

pub async fn sign_out_internal(ctx: &AppContext) -> Result<(), String> {
    ctx.auth
        .sign_out()
        .await
        .map_err(|e| format!("Sign out error: {e}"))
}

#[cfg(feature = "app")]
#[tauri::command]
pub async fn sign_in(
    ctx: tauri::State<'_, Arc<AppContext>>,
    email: String,
    password: String,
) -> Result<User, String> {
    sign_in_internal(ctx.inner(), &email, &password).await
}

#[cfg(feature = "app")]
#[tauri::command]
pub async fn sign_up(ctx: tauri::State<'_, Arc<AppContext>>, form: SignUpForm) -> Result<User, String> {
    sign_up_internal(ctx.inner(), &form).await
}

#[cfg(feature = "app")]
#[tauri::command]
pub async fn sign_in_with_credential(
    ctx: tauri::State<'_, Arc<AppContext>>,
    credential: FederatedCredential,
) -> Result<User, String> {
    sign_in_with_credential_internal(ctx.inner(), &credential).await
}

#[cfg(feature = "app")]
#[tauri::command]
pub async fn sign_out(ctx: tauri::State<'_, Arc<AppContext>>) -> Result<(), String> {
    sign_out_internal(ctx.inner()).await
}

#[cfg(feature = "app")]
#[tauri::command]
pub fn current_user(ctx: tauri::State<'_, Arc<AppContext>>) -> Option<User> {
    ctx.auth.current_user()
}

#[cfg(feature = "app")]
#[tauri::command]
pub fn auth_state(ctx: tauri::State<'_, Arc<AppContext>>) -> UiState<User> {
    ctx.auth.state().current()
}

use crate::context::AppContext;
use crate::models::image::ImageSource;
use crate::models::user::{ProfileUpdate, User};
#[cfg(feature = "app")]
use {crate::state::profile::ProfileState, std::sync::Arc};

pub async fn load_profile_internal(ctx: &AppContext) -> Result<User, String> {
    ctx.profile.load().await.map_err(|e| e.to_string())
}

pub fn select_profile_image_internal(ctx: &AppContext, image: Option<ImageSource>) {
    match image {
        Some(image) => ctx.profile.select_image(image),
        None => ctx.profile.clear_image(),
    }
}

pub async fn save_profile_internal(ctx: &AppContext, update: ProfileUpdate) -> Result<User, String> {
    ctx.profile.save(update).await.map_err(|e| e.to_string())
}

#[cfg(feature = "app")]
#[tauri::command]
pub async fn load_profile(ctx: tauri::State<'_, Arc<AppContext>>) -> Result<User, String> {
    load_profile_internal(ctx.inner()).await
}

#[cfg(feature = "app")]
#[tauri::command]
pub fn select_profile_image(ctx: tauri::State<'_, Arc<AppContext>>, image: Option<ImageSource>) {
    select_profile_image_internal(ctx.inner(), image);
}

#[cfg(feature = "app")]
#[tauri::command]
pub async fn save_profile(
    ctx: tauri::State<'_, Arc<AppContext>>,
    update: ProfileUpdate,
) -> Result<User, String> {
    save_profile_internal(ctx.inner(), update).await
}

#[cfg(feature = "app")]
#[tauri::command]
pub fn profile_state(ctx: tauri::State<'_, Arc<AppContext>>) -> ProfileState {
    ctx.profile.state().current()
}

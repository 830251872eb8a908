use crate::context::AppContext;
use crate::models::image::ImageSource;
use crate::models::repair_request::{RepairRequest, RepairRequestDraft};
use crate::state::booking::SubmissionState;
use std::sync::Arc;

/// Reset the booking screen and return its fresh state.
pub fn enter_booking_internal(ctx: &AppContext) -> SubmissionState {
    ctx.booking.enter();
    ctx.booking.state().current()
}

pub fn add_booking_images_internal(ctx: &AppContext, images: Vec<ImageSource>) -> Vec<ImageSource> {
    for image in images {
        ctx.booking.add_image(image);
    }
    ctx.booking.selected_images()
}

pub fn remove_booking_image_internal(ctx: &AppContext, index: usize) -> Vec<ImageSource> {
    ctx.booking.remove_image(index);
    ctx.booking.selected_images()
}

/// Runs the submission as its own task so it finishes even if the caller
/// goes away.
pub async fn submit_repair_request_internal(
    ctx: Arc<AppContext>,
    draft: RepairRequestDraft,
) -> Result<RepairRequest, String> {
    let task = tokio::spawn(async move { ctx.booking.submit(draft).await });
    match task.await {
        Ok(result) => result.map_err(|e| e.to_string()),
        Err(e) => Err(format!("Submission task error: {e}")),
    }
}

#[cfg(feature = "app")]
#[tauri::command]
pub fn enter_booking(ctx: tauri::State<'_, Arc<AppContext>>) -> SubmissionState {
    enter_booking_internal(ctx.inner())
}

#[cfg(feature = "app")]
#[tauri::command]
pub fn add_booking_images(
    ctx: tauri::State<'_, Arc<AppContext>>,
    images: Vec<ImageSource>,
) -> Vec<ImageSource> {
    add_booking_images_internal(ctx.inner(), images)
}

/// Opens the native picker and adds whatever the user chose.
#[cfg(feature = "app")]
#[tauri::command]
pub async fn pick_booking_images(
    app: tauri::AppHandle,
    ctx: tauri::State<'_, Arc<AppContext>>,
) -> Result<Vec<ImageSource>, String> {
    use tauri_plugin_dialog::DialogExt;

    let (tx, rx) = tokio::sync::oneshot::channel();
    app.dialog()
        .file()
        .add_filter("Images", &["jpg", "jpeg", "png", "webp"])
        .pick_files(move |files| {
            let _ = tx.send(files);
        });

    let picked = rx.await.map_err(|e| format!("Image picker error: {e}"))?;
    let mut images = Vec::new();
    for file in picked.unwrap_or_default() {
        let path = file
            .into_path()
            .map_err(|e| format!("Image picker error: {e}"))?;
        images.push(ImageSource::File(path));
    }
    Ok(add_booking_images_internal(ctx.inner(), images))
}

#[cfg(feature = "app")]
#[tauri::command]
pub fn remove_booking_image(
    ctx: tauri::State<'_, Arc<AppContext>>,
    index: usize,
) -> Vec<ImageSource> {
    remove_booking_image_internal(ctx.inner(), index)
}

#[cfg(feature = "app")]
#[tauri::command]
pub async fn submit_repair_request(
    ctx: tauri::State<'_, Arc<AppContext>>,
    draft: RepairRequestDraft,
) -> Result<RepairRequest, String> {
    submit_repair_request_internal(ctx.inner().clone(), draft).await
}

#[cfg(feature = "app")]
#[tauri::command]
pub fn submission_state(ctx: tauri::State<'_, Arc<AppContext>>) -> SubmissionState {
    ctx.booking.state().current()
}

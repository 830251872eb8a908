use crate::context::AppContext;
use crate::models::review::{Review, ReviewDraft};
#[cfg(feature = "app")]
use std::sync::Arc;

pub async fn submit_review_internal(ctx: &AppContext, draft: ReviewDraft) -> Result<Review, String> {
    ctx.reviews.submit(draft).await.map_err(|e| e.to_string())
}

pub async fn technician_reviews_internal(ctx: &AppContext, technician_id: &str) -> Result<Vec<Review>, String> {
    ctx.reviews
        .for_technician(technician_id)
        .await
        .map_err(|e| format!("Review query error: {e}"))
}

#[cfg(feature = "app")]
#[tauri::command]
pub async fn submit_review(
    ctx: tauri::State<'_, Arc<AppContext>>,
    draft: ReviewDraft,
) -> Result<Review, String> {
    submit_review_internal(ctx.inner(), draft).await
}

#[cfg(feature = "app")]
#[tauri::command]
pub async fn technician_reviews(
    ctx: tauri::State<'_, Arc<AppContext>>,
    technician_id: String,
) -> Result<Vec<Review>, String> {
    technician_reviews_internal(ctx.inner(), &technician_id).await
}

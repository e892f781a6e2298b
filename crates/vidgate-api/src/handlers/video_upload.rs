//! Video upload handler
//!
//! `POST /videos/{video_id}/video`: authenticate, check ownership, stage
//! the multipart payload, classify and rewrite it, publish to the object
//! store, then record the public URL. The record is only touched after the
//! put succeeds, so a failed upload can never leave a URL pointing at bytes
//! that are not durably stored.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::HeaderMap,
    Json,
};
use uuid::Uuid;

use vidgate_core::models::Video;
use vidgate_core::AppError;

use crate::auth;
use crate::error::HttpAppError;
use crate::services::upload;
use crate::state::AppState;

pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<Uuid>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<Video>, HttpAppError> {
    let token = auth::extract_bearer_token(&headers)?;
    let user_id = auth::validate_token(token, &state.config.jwt_secret)?;

    let mut video = state
        .videos
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

    if video.user_id != user_id {
        return Err(HttpAppError(AppError::Forbidden(
            "You do not own this video".to_string(),
        )));
    }

    tracing::info!(video_id = %video_id, user_id = %user_id, "Uploading video");

    // Staged file is removed on drop, whatever happens below.
    let staged = upload::stage_video_field(multipart, state.config.max_video_size_bytes).await?;

    let key = upload::publish_video(&state, staged.path()).await?;
    let url = upload::video_public_url(&state.config.cdn_base_url, &key);

    video.video_url = Some(url);
    if let Err(e) = state.videos.update_video(&video).await {
        // The bytes are already durable under `key`; only the record is
        // missing the URL. Log loudly enough for an operator to reconcile.
        tracing::error!(
            video_id = %video.id,
            key = %key,
            error = %e,
            "Video stored but record update failed (stored_but_unrecorded)"
        );
        return Err(HttpAppError(e));
    }

    tracing::info!(video_id = %video.id, key = %key, "Video published");
    Ok(Json(video))
}

//! Thumbnail upload handler
//!
//! `POST /videos/{video_id}/thumbnail`: the simpler sideload path. No
//! intermediate files and no external tools; the validated image is written
//! straight into the locally served asset directory under a random name.

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
use crate::services::upload::{self, THUMBNAIL_FIELD};
use crate::state::AppState;

pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<Uuid>,
    headers: HeaderMap,
    mut multipart: Multipart,
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

    tracing::info!(video_id = %video_id, user_id = %user_id, "Uploading thumbnail");

    let (filename, data) = loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("Unable to parse multipart form: {}", e)))?
            .ok_or_else(|| {
                AppError::BadRequest(format!("Missing multipart field '{}'", THUMBNAIL_FIELD))
            })?;

        if field.name() != Some(THUMBNAIL_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let filename = upload::derive_thumbnail_filename(&content_type)?;

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Error while reading upload: {}", e)))?;
        if data.is_empty() {
            return Err(HttpAppError(AppError::BadRequest(
                "Uploaded thumbnail is empty".to_string(),
            )));
        }
        if data.len() > state.config.max_thumbnail_size_bytes {
            return Err(HttpAppError(AppError::PayloadTooLarge(format!(
                "Thumbnail exceeds the {} byte limit",
                state.config.max_thumbnail_size_bytes
            ))));
        }

        break (filename, data);
    };

    let url = state
        .assets
        .save(&filename, &data)
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;

    video.thumbnail_url = Some(url);
    state.videos.update_video(&video).await?;

    tracing::info!(video_id = %video.id, filename = %filename, "Thumbnail saved");
    Ok(Json(video))
}

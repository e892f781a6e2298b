//! Upload pipeline: staging, key derivation, and video publishing
//!
//! The orchestration steps shared by the upload handlers. A video passes
//! through here as: staged temp file → signature check → probe → fast-start
//! rewrite → key derivation → object-store put. Each step's error is checked
//! before the next runs, and every temporary file is owned by a guard that
//! removes it when the request ends, success or not.

use std::path::Path;

use axum::extract::Multipart;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use tempfile::NamedTempFile;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use vidgate_core::AppError;
use vidgate_processing::sniff::{looks_like_mp4, SNIFF_LEN};
use vidgate_processing::{probe_aspect_class, rewrite_for_faststart, AspectClass};

use crate::state::AppState;

pub const VIDEO_FIELD: &str = "video";
pub const THUMBNAIL_FIELD: &str = "thumbnail";

const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Strip MIME parameters: `video/mp4; codecs=...` → `video/mp4`.
fn mime_essence(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
}

/// Read the multipart field named `video` into a private temp file.
///
/// The field's declared content type must be exactly `video/mp4` and the
/// payload must stay under `max_bytes`. The returned guard deletes the file
/// on drop, so staged bytes never outlive the request.
pub async fn stage_video_field(
    mut multipart: Multipart,
    max_bytes: usize,
) -> Result<NamedTempFile, AppError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Unable to parse multipart form: {}", e)))?
    {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        let content_type = field
            .content_type()
            .map(mime_essence)
            .unwrap_or_default()
            .to_string();
        if content_type != VIDEO_CONTENT_TYPE {
            return Err(AppError::UnsupportedMediaType(format!(
                "Unsupported file type '{}', expected {}",
                content_type, VIDEO_CONTENT_TYPE
            )));
        }

        let staged = NamedTempFile::new()?;
        let mut file = tokio::fs::File::from_std(staged.reopen()?);

        let mut total: usize = 0;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::BadRequest(format!("Error while reading upload: {}", e)))?
        {
            total += chunk.len();
            if total > max_bytes {
                return Err(AppError::PayloadTooLarge(format!(
                    "Video exceeds the {} byte limit",
                    max_bytes
                )));
            }
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        if total == 0 {
            return Err(AppError::BadRequest("Uploaded video is empty".to_string()));
        }

        tracing::debug!(size_bytes = total, path = %staged.path().display(), "Staged video upload");
        return Ok(staged);
    }

    Err(AppError::BadRequest(format!(
        "Missing multipart field '{}'",
        VIDEO_FIELD
    )))
}

/// Run the staged file through the processing pipeline and publish it.
///
/// Returns the derived storage key. The record update is the caller's job;
/// nothing here touches the metadata store, so a failed put can never leave
/// a record pointing at bytes that were not stored.
pub async fn publish_video(state: &AppState, staged: &Path) -> Result<String, AppError> {
    let header = read_header(staged).await?;
    if !looks_like_mp4(&header) {
        return Err(AppError::BadRequest(
            "Upload does not look like an MP4 file".to_string(),
        ));
    }

    let class = probe_aspect_class(state.runner.as_ref(), &state.config.ffprobe_path, staged)
        .await
        .map_err(|e| AppError::Processing(e.to_string()))?;

    let processed = rewrite_for_faststart(state.runner.as_ref(), &state.config.ffmpeg_path, staged)
        .await
        .map_err(|e| AppError::Processing(e.to_string()))?;

    let key = derive_video_key(class);

    let data = tokio::fs::read(processed.path()).await?;
    state
        .object_store
        .put_object(&key, data, VIDEO_CONTENT_TYPE)
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;

    Ok(key)
    // `processed` drops here and removes the rewritten file.
}

/// Derive the storage key: `<folder>/<32 hex chars>.mp4`, 16 bytes of
/// cryptographically secure randomness.
pub fn derive_video_key(class: AspectClass) -> String {
    let mut random = [0u8; 16];
    rand::rng().fill_bytes(&mut random);
    format!("{}/{}.mp4", class.folder(), hex::encode(random))
}

/// Public URL for a published video key behind the CDN distribution.
pub fn video_public_url(cdn_base_url: &str, key: &str) -> String {
    format!("{}/{}", cdn_base_url.trim_end_matches('/'), key)
}

/// Derive a thumbnail asset filename for the given image content type:
/// 32 random bytes, URL-safe base64 without padding, plus the extension.
pub fn derive_thumbnail_filename(content_type: &str) -> Result<String, AppError> {
    let extension = match mime_essence(content_type) {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        other => {
            return Err(AppError::UnsupportedMediaType(format!(
                "Unsupported file type '{}', expected image/jpeg or image/png",
                other
            )))
        }
    };

    let mut random = [0u8; 32];
    rand::rng().fill_bytes(&mut random);
    Ok(format!("{}.{}", URL_SAFE_NO_PAD.encode(random), extension))
}

async fn read_header(path: &Path) -> Result<Vec<u8>, AppError> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut header = vec![0u8; SNIFF_LEN];
    let mut filled = 0;
    while filled < header.len() {
        let n = file.read(&mut header[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    header.truncate(filled);
    Ok(header)
}

//! Route configuration and setup

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Slack for multipart boundaries and headers on top of the payload cap.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Assemble the application router.
///
/// Auth happens inside the handlers (the bearer token resolves the acting
/// user per request), so the only route-level differences are the body
/// limits: 1 GiB-class for video, 10 MiB-class for thumbnails.
pub fn build_router(state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(&state)?;

    let video_routes = Router::new()
        .route(
            "/videos/{video_id}/video",
            post(handlers::video_upload::upload_video),
        )
        .layer(RequestBodyLimitLayer::new(
            state.config.max_video_size_bytes + MULTIPART_OVERHEAD,
        ))
        .layer(DefaultBodyLimit::disable());

    let thumbnail_routes = Router::new()
        .route(
            "/videos/{video_id}/thumbnail",
            post(handlers::thumbnail_upload::upload_thumbnail),
        )
        .layer(RequestBodyLimitLayer::new(
            state.config.max_thumbnail_size_bytes + MULTIPART_OVERHEAD,
        ))
        .layer(DefaultBodyLimit::disable());

    let router = Router::new()
        .route("/healthz", get(handlers::health::healthz))
        .merge(video_routes)
        .merge(thumbnail_routes)
        .nest_service(
            "/assets",
            ServeDir::new(state.assets.base_path().to_path_buf()),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    Ok(router)
}

fn setup_cors(state: &Arc<AppState>) -> Result<CorsLayer, anyhow::Error> {
    if state.config.cors_origins.is_empty() {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    let origins = state
        .config
        .cors_origins
        .iter()
        .map(|o| o.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any))
}

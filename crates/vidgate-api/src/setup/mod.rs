//! Application assembly: state construction, routes, server lifecycle.

pub mod routes;
pub mod server;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use vidgate_core::Config;
use vidgate_db::PgVideoRepository;
use vidgate_processing::SystemRunner;
use vidgate_storage::{AssetStore, S3Publisher};

use crate::state::AppState;

/// Build the production application state: database pool (with migrations),
/// S3 publisher, asset store, and the real command runner.
pub async fn build_state(config: Config) -> Result<Arc<AppState>, anyhow::Error> {
    let pool = vidgate_db::connect_pool(&config.database_url, config.db_max_connections)
        .await
        .context("Failed to connect to database")?;

    vidgate_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let object_store = S3Publisher::new(
        config.s3_bucket.clone(),
        config.s3_region.clone(),
        config.s3_endpoint.clone(),
    )
    .context("Failed to configure object storage")?;

    let assets = AssetStore::new(config.assets_root.clone(), config.assets_base_url.clone())
        .await
        .context("Failed to configure asset storage")?;

    let runner = SystemRunner::new(Duration::from_secs(config.tool_timeout_secs));

    Ok(Arc::new(AppState {
        videos: Arc::new(PgVideoRepository::new(pool)),
        object_store: Arc::new(object_store),
        assets,
        runner: Arc::new(runner),
        config,
    }))
}

//! Vidgate database layer
//!
//! The metadata store collaborator. The upload pipeline only needs the
//! narrow [`VideoRepository`] contract (read a record, write its URL fields
//! back), so the Postgres implementation lives behind a trait and tests run
//! against an in-memory substitute.

pub mod video;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

pub use video::{PgVideoRepository, VideoRepository};

const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Connect a Postgres pool with the configured connection ceiling.
pub async fn connect_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .connect(database_url)
        .await
}

/// Apply pending migrations from this crate's `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

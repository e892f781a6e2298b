//! Configuration module
//!
//! One immutable configuration struct, built from the environment at startup
//! and passed by reference into every component. There is no ambient global
//! configuration anywhere in the workspace.

use std::env;

use anyhow::{anyhow, Context};

const DEFAULT_PORT: u16 = 8091;
const DEFAULT_MAX_VIDEO_BYTES: usize = 1 << 30; // 1 GiB
const DEFAULT_MAX_THUMBNAIL_BYTES: usize = 10 << 20; // 10 MiB
const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 300;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;

/// Application configuration (ingestion service).
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    // Object storage configuration
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers
    // Base URL of the CDN distribution fronting the object store
    pub cdn_base_url: String,
    // Locally served asset directory (thumbnails)
    pub assets_root: String,
    pub assets_base_url: String,
    // Upload limits
    pub max_video_size_bytes: usize,
    pub max_thumbnail_size_bytes: usize,
    // External tool configuration
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub tool_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let server_port = env_or("PORT", DEFAULT_PORT.to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let config = Config {
            server_port,
            environment: env_or("ENVIRONMENT", "development".to_string()),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            database_url: require("DATABASE_URL")?,
            db_max_connections: env_or(
                "DB_MAX_CONNECTIONS",
                DEFAULT_DB_MAX_CONNECTIONS.to_string(),
            )
            .parse()
            .context("DB_MAX_CONNECTIONS must be a number")?,
            jwt_secret: require("JWT_SECRET")?,
            s3_bucket: require("S3_BUCKET")?,
            s3_region: env_or("S3_REGION", "us-east-1".to_string()),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            cdn_base_url: require("CDN_BASE_URL")?,
            assets_root: env_or("ASSETS_ROOT", "./assets".to_string()),
            assets_base_url: env_or(
                "ASSETS_BASE_URL",
                format!("http://localhost:{}", server_port),
            ),
            max_video_size_bytes: env_or(
                "MAX_VIDEO_SIZE_BYTES",
                DEFAULT_MAX_VIDEO_BYTES.to_string(),
            )
            .parse()
            .context("MAX_VIDEO_SIZE_BYTES must be a number")?,
            max_thumbnail_size_bytes: env_or(
                "MAX_THUMBNAIL_SIZE_BYTES",
                DEFAULT_MAX_THUMBNAIL_BYTES.to_string(),
            )
            .parse()
            .context("MAX_THUMBNAIL_SIZE_BYTES must be a number")?,
            ffmpeg_path: env_or("FFMPEG_PATH", "ffmpeg".to_string()),
            ffprobe_path: env_or("FFPROBE_PATH", "ffprobe".to_string()),
            tool_timeout_secs: env_or(
                "TOOL_TIMEOUT_SECS",
                DEFAULT_TOOL_TIMEOUT_SECS.to_string(),
            )
            .parse()
            .context("TOOL_TIMEOUT_SECS must be a number")?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.len() < 32 {
            return Err(anyhow!("JWT_SECRET must be at least 32 characters"));
        }
        if self.s3_bucket.is_empty() {
            return Err(anyhow!("S3_BUCKET must not be empty"));
        }
        if self.max_video_size_bytes == 0 || self.max_thumbnail_size_bytes == 0 {
            return Err(anyhow!("upload size limits must be greater than zero"));
        }
        if self.tool_timeout_secs == 0 {
            return Err(anyhow!("TOOL_TIMEOUT_SECS must be greater than zero"));
        }
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

fn require(name: &str) -> Result<String, anyhow::Error> {
    env::var(name).map_err(|_| anyhow!("{} must be set", name))
}

fn env_or(name: &str, default: String) -> String {
    env::var(name).unwrap_or(default)
}

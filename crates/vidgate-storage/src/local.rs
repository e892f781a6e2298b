//! Local asset store for thumbnails
//!
//! Thumbnails skip the object store entirely: they are written into a
//! directory the HTTP server serves directly under `/assets/`.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::traits::{StorageError, StorageResult};

/// Locally served asset directory
#[derive(Clone)]
pub struct AssetStore {
    base_path: PathBuf,
    base_url: String,
}

impl AssetStore {
    /// Create a new AssetStore rooted at `base_path`, served under
    /// `{base_url}/assets/`.
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create asset directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(AssetStore {
            base_path,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Validate a filename stays inside the asset directory. Names are
    /// generated server-side, so anything with a separator is a bug or an
    /// attack, never legitimate input.
    fn validate_filename(filename: &str) -> StorageResult<()> {
        if filename.is_empty()
            || filename.contains("..")
            || filename.contains('/')
            || filename.contains('\\')
        {
            return Err(StorageError::InvalidKey(format!(
                "Invalid asset filename: {}",
                filename
            )));
        }
        Ok(())
    }

    /// Write the bytes under `filename` and return the public URL.
    pub async fn save(&self, filename: &str, data: &[u8]) -> StorageResult<String> {
        Self::validate_filename(filename)?;

        let path = self.base_path.join(filename);
        let start = std::time::Instant::now();

        fs::write(&path, data).await?;

        tracing::info!(
            path = %path.display(),
            size_bytes = data.len() as u64,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Asset write successful"
        );

        Ok(self.public_url(filename))
    }

    /// Public URL for an asset filename.
    pub fn public_url(&self, filename: &str) -> String {
        format!("{}/assets/{}", self.base_url, filename)
    }
}

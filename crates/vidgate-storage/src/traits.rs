//! Storage abstraction traits

use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable object-store publisher.
///
/// One blocking put of the entire payload under a caller-derived key with a
/// declared content type. No multipart semantics, no internal retries; a
/// failed put is terminal for the request and the caller decides whether to
/// try again.
#[async_trait]
pub trait ObjectPublisher: Send + Sync {
    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()>;
}

//! Vidgate storage library
//!
//! Two small storage surfaces: the durable object-store publisher that video
//! files are pushed to under derived keys, and the local asset store that
//! serves thumbnails straight off disk.

pub mod local;
pub mod s3;
pub mod traits;

pub use local::AssetStore;
pub use s3::S3Publisher;
pub use traits::{ObjectPublisher, StorageError, StorageResult};

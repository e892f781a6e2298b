//! Vidgate core library
//!
//! Shared foundation for the vidgate workspace: application configuration,
//! the unified error taxonomy, and the domain models exchanged between the
//! API, database, and storage crates.

pub mod config;
pub mod error;
pub mod models;

pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};

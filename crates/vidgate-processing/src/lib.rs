//! Vidgate processing library
//!
//! Thin orchestration layer over the external media tools: an ffprobe-based
//! stream prober that classifies aspect ratio, and an ffmpeg-based container
//! rewriter that repackages uploads for fast-start progressive playback.
//! Both go through the [`CommandRunner`] capability so tests can substitute
//! a fake tool without spawning real binaries.

pub mod command;
pub mod faststart;
pub mod probe;
pub mod sniff;

pub use command::{CommandRunner, SystemRunner, ToolOutput};
pub use faststart::{rewrite_for_faststart, ProcessedFile};
pub use probe::{probe_aspect_class, AspectClass};

/// Processing operation errors
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Tool invocation failed: {0}")]
    ToolInvocation(String),

    #[error("{tool} timed out after {timeout_secs}s")]
    ToolTimeout { tool: String, timeout_secs: u64 },

    #[error("Failed to parse tool output: {0}")]
    Parse(String),

    #[error("No video stream with positive dimensions found")]
    NoVideoStream,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for processing operations
pub type ProcessingResult<T> = Result<T, ProcessingError>;

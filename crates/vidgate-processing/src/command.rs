//! External tool invocation capability
//!
//! Subprocess execution sits behind the [`CommandRunner`] trait so the prober
//! and rewriter can be exercised in tests with canned output instead of real
//! ffmpeg/ffprobe binaries.

use std::ffi::OsString;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::{ProcessingError, ProcessingResult};

/// Captured result of a finished tool invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub success: bool,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    /// Short stderr excerpt for error messages.
    pub fn stderr_excerpt(&self) -> String {
        let text = String::from_utf8_lossy(&self.stderr);
        let trimmed = text.trim();
        if trimmed.len() > 512 {
            format!("{}...", &trimmed[..512])
        } else {
            trimmed.to_string()
        }
    }
}

/// Capability interface for running external tools.
///
/// `run` resolves once the process has exited; a non-zero exit is reported
/// through `ToolOutput::success`, not as an `Err`. `Err` is reserved for
/// failures to launch, timeouts, and IO problems around the child.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[OsString]) -> ProcessingResult<ToolOutput>;
}

/// Production runner: spawns the tool as a child process with a bounded
/// runtime. The child is killed if the timeout elapses or the request
/// driving the invocation is cancelled.
pub struct SystemRunner {
    timeout: Duration,
}

impl SystemRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[OsString]) -> ProcessingResult<ToolOutput> {
        let start = std::time::Instant::now();

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ProcessingError::ToolInvocation(format!("failed to launch {}: {}", program, e))
            })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ProcessingError::ToolTimeout {
                tool: program.to_string(),
                timeout_secs: self.timeout.as_secs(),
            })?
            .map_err(|e| {
                ProcessingError::ToolInvocation(format!("failed to wait for {}: {}", program, e))
            })?;

        tracing::debug!(
            tool = program,
            exit_success = output.status.success(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Tool invocation finished"
        );

        Ok(ToolOutput {
            success: output.status.success(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

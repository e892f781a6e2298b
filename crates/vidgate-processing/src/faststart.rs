//! Container rewriter - lossless repackaging for progressive playback
//!
//! Stream-copies the input into an MP4 container with the metadata atoms
//! moved to the front of the file, so playback can begin before the full
//! file has downloaded. No re-encode happens; decoded content is identical.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::command::CommandRunner;
use crate::{ProcessingError, ProcessingResult};

/// Output of the rewriter. Owns the file on disk and removes it when
/// dropped, so the artifact cannot outlive the request that produced it.
#[derive(Debug)]
pub struct ProcessedFile {
    path: PathBuf,
}

impl ProcessedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ProcessedFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to remove processed file"
                );
            }
        }
    }
}

/// Derive the rewriter output path: `<input>.processing`.
fn output_path(input: &Path) -> PathBuf {
    let mut os = input.as_os_str().to_os_string();
    os.push(".processing");
    PathBuf::from(os)
}

/// Rewrite the file at `input` into a fast-start MP4 next to it.
///
/// The input file is left untouched. On tool failure any partial output is
/// removed before the error is returned.
pub async fn rewrite_for_faststart(
    runner: &dyn CommandRunner,
    ffmpeg_path: &str,
    input: &Path,
) -> ProcessingResult<ProcessedFile> {
    let start = std::time::Instant::now();
    let output = output_path(input);

    let args: Vec<OsString> = vec![
        "-i".into(),
        input.as_os_str().to_os_string(),
        "-c".into(),
        "copy".into(),
        "-movflags".into(),
        "faststart".into(),
        "-f".into(),
        "mp4".into(),
        output.as_os_str().to_os_string(),
    ];

    let result = runner.run(ffmpeg_path, &args).await;

    let tool_output = match result {
        Ok(out) => out,
        Err(e) => {
            remove_partial(&output);
            return Err(e);
        }
    };

    if !tool_output.success {
        remove_partial(&output);
        return Err(ProcessingError::ToolInvocation(format!(
            "ffmpeg exited with failure: {}",
            tool_output.stderr_excerpt()
        )));
    }

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Container rewrite completed"
    );

    Ok(ProcessedFile { path: output })
}

fn remove_partial(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove partial output");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ToolOutput;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Fake ffmpeg: records the argument vector and writes the output file
    /// the way the real tool would.
    struct RecordingRunner {
        args_seen: Mutex<Vec<Vec<OsString>>>,
        succeed: bool,
        write_output: bool,
    }

    impl RecordingRunner {
        fn new(succeed: bool, write_output: bool) -> Self {
            Self {
                args_seen: Mutex::new(Vec::new()),
                succeed,
                write_output,
            }
        }
    }

    #[async_trait]
    impl CommandRunner for RecordingRunner {
        async fn run(&self, _program: &str, args: &[OsString]) -> ProcessingResult<ToolOutput> {
            self.args_seen.lock().unwrap().push(args.to_vec());
            if self.write_output {
                let out = args.last().unwrap();
                std::fs::write(out, b"remuxed").unwrap();
            }
            Ok(ToolOutput {
                success: self.succeed,
                stdout: Vec::new(),
                stderr: if self.succeed {
                    Vec::new()
                } else {
                    b"muxer error".to_vec()
                },
            })
        }
    }

    /// Fake ffmpeg that gets far enough to write a partial output file and
    /// then times out.
    struct TimingOutRunner;

    #[async_trait]
    impl CommandRunner for TimingOutRunner {
        async fn run(&self, program: &str, args: &[OsString]) -> ProcessingResult<ToolOutput> {
            std::fs::write(args.last().unwrap(), b"partial").unwrap();
            Err(ProcessingError::ToolTimeout {
                tool: program.to_string(),
                timeout_secs: 1,
            })
        }
    }

    #[test]
    fn test_output_path_appends_processing_suffix() {
        let out = output_path(Path::new("/tmp/upload.mp4"));
        assert_eq!(out, PathBuf::from("/tmp/upload.mp4.processing"));
    }

    #[tokio::test]
    async fn test_rewrite_invokes_stream_copy_args() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.mp4");
        std::fs::write(&input, b"source").unwrap();

        let runner = RecordingRunner::new(true, true);
        let processed = rewrite_for_faststart(&runner, "ffmpeg", &input)
            .await
            .unwrap();

        assert_eq!(processed.path(), output_path(&input));
        assert!(processed.path().exists());
        // Input is never deleted by the rewriter.
        assert!(input.exists());

        let args = runner.args_seen.lock().unwrap();
        let flat: Vec<String> = args[0]
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(flat[0], "-i");
        assert!(flat.contains(&"copy".to_string()));
        assert!(flat.contains(&"faststart".to_string()));
        assert!(flat.contains(&"mp4".to_string()));
    }

    #[tokio::test]
    async fn test_rewrite_failure_removes_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.mp4");
        std::fs::write(&input, b"source").unwrap();

        let runner = RecordingRunner::new(false, true);
        let err = rewrite_for_faststart(&runner, "ffmpeg", &input)
            .await
            .unwrap_err();

        match err {
            ProcessingError::ToolInvocation(msg) => assert!(msg.contains("muxer error")),
            other => panic!("expected ToolInvocation, got {:?}", other),
        }
        assert!(!output_path(&input).exists());
    }

    #[tokio::test]
    async fn test_rewrite_timeout_removes_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.mp4");
        std::fs::write(&input, b"source").unwrap();

        let err = rewrite_for_faststart(&TimingOutRunner, "ffmpeg", &input)
            .await
            .unwrap_err();

        match err {
            ProcessingError::ToolTimeout { tool, .. } => assert_eq!(tool, "ffmpeg"),
            other => panic!("expected ToolTimeout, got {:?}", other),
        }
        assert!(!output_path(&input).exists());
        assert!(input.exists());
    }

    #[tokio::test]
    async fn test_processed_file_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.mp4");
        std::fs::write(&input, b"source").unwrap();

        let runner = RecordingRunner::new(true, true);
        let out_path;
        {
            let processed = rewrite_for_faststart(&runner, "ffmpeg", &input)
                .await
                .unwrap();
            out_path = processed.path().to_path_buf();
            assert!(out_path.exists());
        }
        assert!(!out_path.exists());
    }
}

//! Media prober - stream inspection and aspect ratio classification

use std::ffi::OsString;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;

use serde::Deserialize;

use crate::command::CommandRunner;
use crate::{ProcessingError, ProcessingResult};

const ASPECT_TOLERANCE: f64 = 0.1;

/// Aspect ratio classification of the dominant video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectClass {
    Landscape,
    Portrait,
    Other,
}

impl AspectClass {
    /// Storage key folder segment for this class.
    pub fn folder(&self) -> &'static str {
        match self {
            AspectClass::Landscape => "landscape",
            AspectClass::Portrait => "portrait",
            AspectClass::Other => "other",
        }
    }
}

impl Display for AspectClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.folder())
    }
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

/// One stream entry from ffprobe's JSON output. Audio and data streams
/// carry no dimensions, which serde defaults to zero.
#[derive(Debug, Deserialize)]
pub struct FfprobeStream {
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

/// Inspect the file at `path` and classify its dominant video stream.
///
/// Runs the inspection tool through the given runner, requesting JSON stream
/// metadata, and classifies the first stream with strictly positive width
/// and height.
pub async fn probe_aspect_class(
    runner: &dyn CommandRunner,
    ffprobe_path: &str,
    path: &Path,
) -> ProcessingResult<AspectClass> {
    let start = std::time::Instant::now();

    let args: Vec<OsString> = vec![
        "-v".into(),
        "error".into(),
        "-print_format".into(),
        "json".into(),
        "-show_streams".into(),
        path.as_os_str().to_os_string(),
    ];

    let output = runner.run(ffprobe_path, &args).await?;
    if !output.success {
        return Err(ProcessingError::ToolInvocation(format!(
            "ffprobe exited with failure: {}",
            output.stderr_excerpt()
        )));
    }

    let probe: FfprobeOutput = serde_json::from_slice(&output.stdout)
        .map_err(|e| ProcessingError::Parse(format!("invalid ffprobe JSON: {}", e)))?;

    let class = classify_streams(&probe.streams)?;

    tracing::info!(
        path = %path.display(),
        aspect = %class,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Video probe completed"
    );

    Ok(class)
}

/// Classify the first stream with positive dimensions; streams without both
/// dimensions (audio, subtitles) are skipped.
pub fn classify_streams(streams: &[FfprobeStream]) -> ProcessingResult<AspectClass> {
    streams
        .iter()
        .find(|s| s.width > 0 && s.height > 0)
        .map(|s| classify(s.width, s.height))
        .ok_or(ProcessingError::NoVideoStream)
}

fn classify(width: u32, height: u32) -> AspectClass {
    let ratio = width as f64 / height as f64;
    if (ratio - 16.0 / 9.0).abs() < ASPECT_TOLERANCE {
        AspectClass::Landscape
    } else if (ratio - 9.0 / 16.0).abs() < ASPECT_TOLERANCE {
        AspectClass::Portrait
    } else {
        AspectClass::Other
    }
}

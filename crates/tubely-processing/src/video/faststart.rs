//! Fast-start rewriting: move the MP4 index to the front of the file so
//! playback can begin before the download completes. Streams are copied,
//! never re-encoded.

use crate::error::{ProcessingError, ProcessingResult};
use crate::process::ProcessRunner;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Output of a successful rewrite, next to its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodedFile {
    pub path: PathBuf,
    pub size: u64,
}

#[derive(Clone)]
pub struct FastStartTranscoder {
    runner: Arc<dyn ProcessRunner>,
    ffmpeg_path: String,
    timeout: Duration,
}

/// `{dir}/{stem}.processed.mp4` for an input at `{dir}/{stem}.{ext}`.
pub fn processed_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    input.with_file_name(format!("{}.processed.mp4", stem))
}

impl FastStartTranscoder {
    pub fn new(runner: Arc<dyn ProcessRunner>, ffmpeg_path: String, timeout: Duration) -> Self {
        Self {
            runner,
            ffmpeg_path,
            timeout,
        }
    }

    fn args(input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(16);
        for flag in ["-v", "error", "-y", "-i"] {
            args.push(flag.into());
        }
        args.push(input.as_os_str().to_os_string());
        for flag in [
            "-movflags",
            "faststart",
            "-map_metadata",
            "0",
            "-codec",
            "copy",
            "-f",
            "mp4",
        ] {
            args.push(flag.into());
        }
        args.push(output.as_os_str().to_os_string());
        args
    }

    /// Rewrite `input` into a fast-start MP4 next to it.
    ///
    /// On failure no output file is left behind.
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    pub async fn optimize_for_streaming(&self, input: &Path) -> ProcessingResult<TranscodedFile> {
        let start = std::time::Instant::now();
        let output_path = processed_path(input);

        let result = self
            .runner
            .run(
                &self.ffmpeg_path,
                &Self::args(input, &output_path),
                self.timeout,
            )
            .await;

        let failure = match result {
            Ok(output) if output.success() => None,
            Ok(output) => Some(ProcessingError::TranscodeFailed {
                stderr: output.stderr_lossy(),
            }),
            Err(err) => Some(err),
        };

        if let Some(err) = failure {
            remove_partial(&output_path).await;
            return Err(err);
        }

        let size = match tokio::fs::metadata(&output_path).await {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                return Err(ProcessingError::TranscodeFailed {
                    stderr: format!("ffmpeg reported success but produced no output: {}", e),
                })
            }
        };

        tracing::info!(
            output = %output_path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_millis(),
            "Fast-start rewrite completed"
        );

        Ok(TranscodedFile {
            path: output_path,
            size,
        })
    }
}

async fn remove_partial(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::debug!(path = %path.display(), "Removed partial transcode output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(error = %e, path = %path.display(), "Failed to remove partial transcode output"),
    }
}

//! Dimension probing with ffprobe.

use crate::error::{ProcessingError, ProcessingResult};
use crate::process::ProcessRunner;
use serde::Deserialize;
use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tubely_core::models::AspectClass;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
}

/// Reads the first video stream's dimensions and buckets them into an
/// [`AspectClass`].
#[derive(Clone)]
pub struct MediaProbe {
    runner: Arc<dyn ProcessRunner>,
    ffprobe_path: String,
    timeout: Duration,
}

impl MediaProbe {
    pub fn new(runner: Arc<dyn ProcessRunner>, ffprobe_path: String, timeout: Duration) -> Self {
        Self {
            runner,
            ffprobe_path,
            timeout,
        }
    }

    fn args(path: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height",
            "-of",
            "json",
        ]
        .iter()
        .map(OsString::from)
        .collect();
        args.push(path.as_os_str().to_os_string());
        args
    }

    /// Width and height of the first video stream.
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    pub async fn dimensions(&self, path: &Path) -> ProcessingResult<(u32, u32)> {
        let output = self
            .runner
            .run(&self.ffprobe_path, &Self::args(path), self.timeout)
            .await?;

        if !output.success() {
            return Err(ProcessingError::ProbeFailed {
                stderr: output.stderr_lossy(),
            });
        }

        parse_dimensions(&output.stdout)
    }

    /// Probe `path` and classify its orientation.
    pub async fn probe(&self, path: &Path) -> ProcessingResult<AspectClass> {
        let (width, height) = self.dimensions(path).await?;
        let aspect = AspectClass::classify(width, height).ok_or_else(|| {
            ProcessingError::ProbeParse("video stream reports zero height".to_string())
        })?;

        tracing::info!(width, height, aspect = %aspect, "Video probe completed");
        Ok(aspect)
    }
}

fn parse_dimensions(stdout: &[u8]) -> ProcessingResult<(u32, u32)> {
    let parsed: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| ProcessingError::ProbeParse(format!("invalid JSON: {}", e)))?;

    let stream = parsed
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| ProcessingError::ProbeParse("no video stream found".to_string()))?;

    let width = stream
        .width
        .ok_or_else(|| ProcessingError::ProbeParse("missing width".to_string()))?;
    let height = stream
        .height
        .ok_or_else(|| ProcessingError::ProbeParse("missing height".to_string()))?;

    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessOutput;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies with a fixed output and records the arguments it was given.
    struct CannedRunner {
        output: ProcessOutput,
        calls: Mutex<Vec<(String, Vec<OsString>)>>,
    }

    impl CannedRunner {
        fn new(exit_code: i32, stdout: &str, stderr: &str) -> Arc<Self> {
            Arc::new(Self {
                output: ProcessOutput {
                    exit_code: Some(exit_code),
                    stdout: stdout.as_bytes().to_vec(),
                    stderr: stderr.as_bytes().to_vec(),
                },
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ProcessRunner for CannedRunner {
        async fn run(
            &self,
            program: &str,
            args: &[OsString],
            _timeout: Duration,
        ) -> ProcessingResult<ProcessOutput> {
            self.calls
                .lock()
                .unwrap()
                .push((program.to_string(), args.to_vec()));
            Ok(self.output.clone())
        }
    }

    fn probe_with(runner: Arc<CannedRunner>) -> MediaProbe {
        MediaProbe::new(runner, "ffprobe".to_string(), Duration::from_secs(5))
    }

    fn dims(width: u32, height: u32) -> String {
        format!(r#"{{"programs":[],"streams":[{{"width":{width},"height":{height}}}]}}"#)
    }

    #[tokio::test]
    async fn invokes_ffprobe_with_stream_selection() {
        let runner = CannedRunner::new(0, &dims(1920, 1080), "");
        probe_with(runner.clone())
            .probe(Path::new("/tmp/work/abc.mp4"))
            .await
            .unwrap();

        let calls = runner.calls.lock().unwrap();
        let (program, args) = &calls[0];
        assert_eq!(program, "ffprobe");
        let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().to_string()).collect();
        assert_eq!(
            args,
            vec![
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-show_entries",
                "stream=width,height",
                "-of",
                "json",
                "/tmp/work/abc.mp4"
            ]
        );
    }

    #[tokio::test]
    async fn classifies_common_shapes() {
        let cases = [
            (1920, 1080, AspectClass::Landscape),
            (1080, 1920, AspectClass::Portrait),
            (1080, 1080, AspectClass::Landscape),
            (4000, 2000, AspectClass::Other),
        ];
        for (w, h, expected) in cases {
            let aspect = probe_with(CannedRunner::new(0, &dims(w, h), ""))
                .probe(Path::new("x.mp4"))
                .await
                .unwrap();
            assert_eq!(aspect, expected, "{w}x{h}");
        }
    }

    #[tokio::test]
    async fn failed_probe_carries_stderr() {
        let runner = CannedRunner::new(1, "", "x.mp4: Invalid data found when processing input\n");
        let err = probe_with(runner)
            .probe(Path::new("x.mp4"))
            .await
            .unwrap_err();
        match err {
            ProcessingError::ProbeFailed { stderr } => {
                assert_eq!(stderr, "x.mp4: Invalid data found when processing input")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn zero_height_is_a_parse_error() {
        let err = probe_with(CannedRunner::new(0, &dims(640, 0), ""))
            .probe(Path::new("x.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessingError::ProbeParse(_)));
    }

    #[test]
    fn unusable_output_is_a_parse_error() {
        for stdout in [
            "not json",
            r#"{"streams":[]}"#,
            r#"{}"#,
            r#"{"streams":[{"width":1920}]}"#,
            r#"{"streams":[{"width":"wide","height":1080}]}"#,
        ] {
            let err = parse_dimensions(stdout.as_bytes()).unwrap_err();
            assert!(matches!(err, ProcessingError::ProbeParse(_)), "{stdout}");
        }
    }
}

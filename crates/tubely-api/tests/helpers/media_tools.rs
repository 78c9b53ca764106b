//! Scripted stand-ins for ffprobe and ffmpeg.

use async_trait::async_trait;
use std::ffi::OsString;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tubely_processing::{ProcessOutput, ProcessRunner, ProcessingResult};

/// ffprobe answers with configurable dimensions; ffmpeg copies its input to
/// its output (the last argument). Either can be told to fail.
pub struct FakeMediaTools {
    dimensions: Mutex<(u32, u32)>,
    probe_fails: AtomicBool,
    transcode_fails: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl FakeMediaTools {
    pub fn new() -> Self {
        Self {
            dimensions: Mutex::new((1920, 1080)),
            probe_fails: AtomicBool::new(false),
            transcode_fails: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_dimensions(&self, width: u32, height: u32) {
        *self.dimensions.lock().unwrap() = (width, height);
    }

    pub fn fail_probe(&self) {
        self.probe_fails.store(true, Ordering::SeqCst);
    }

    /// ffmpeg writes a partial output file, then exits non-zero.
    pub fn fail_transcode(&self) {
        self.transcode_fails.store(true, Ordering::SeqCst);
    }

    /// Programs invoked so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn failure(stderr: &str) -> ProcessOutput {
        ProcessOutput {
            exit_code: Some(1),
            stdout: Vec::new(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }
}

#[async_trait]
impl ProcessRunner for FakeMediaTools {
    async fn run(
        &self,
        program: &str,
        args: &[OsString],
        _timeout: Duration,
    ) -> ProcessingResult<ProcessOutput> {
        self.calls.lock().unwrap().push(program.to_string());

        match program {
            "ffprobe" => {
                let input = args.last().expect("ffprobe input path");
                assert!(
                    tokio::fs::try_exists(input).await.unwrap(),
                    "ffprobe ran on a missing file"
                );
                if self.probe_fails.load(Ordering::SeqCst) {
                    return Ok(Self::failure("Invalid data found when processing input"));
                }
                let (width, height) = *self.dimensions.lock().unwrap();
                Ok(ProcessOutput {
                    exit_code: Some(0),
                    stdout: format!(
                        r#"{{"programs":[],"streams":[{{"width":{width},"height":{height}}}]}}"#
                    )
                    .into_bytes(),
                    stderr: Vec::new(),
                })
            }
            "ffmpeg" => {
                let input_index = args
                    .iter()
                    .position(|a| a == "-i")
                    .expect("ffmpeg -i flag")
                    + 1;
                let input = &args[input_index];
                let output = args.last().expect("ffmpeg output path");

                if self.transcode_fails.load(Ordering::SeqCst) {
                    tokio::fs::write(output, b"partial").await?;
                    return Ok(Self::failure("moov atom not found"));
                }
                tokio::fs::copy(input, output).await?;
                Ok(ProcessOutput {
                    exit_code: Some(0),
                    ..ProcessOutput::default()
                })
            }
            other => panic!("unexpected program {other}"),
        }
    }
}

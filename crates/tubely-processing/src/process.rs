//! External process execution.
//!
//! Every ffprobe/ffmpeg invocation goes through [`ProcessRunner`] so the
//! pipeline can be exercised without the binaries installed.

use crate::error::{ProcessingError, ProcessingResult};
use async_trait::async_trait;
use std::ffi::OsString;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `program` with `args` to completion, capturing its output.
    ///
    /// A non-zero exit is reported through [`ProcessOutput`], not as an error.
    /// The process is killed if it outlives `timeout` or if the returned
    /// future is dropped.
    async fn run(
        &self,
        program: &str,
        args: &[OsString],
        timeout: Duration,
    ) -> ProcessingResult<ProcessOutput>;
}

/// Runs processes with `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    #[tracing::instrument(skip(self, args), fields(process.executable.name = %program))]
    async fn run(
        &self,
        program: &str,
        args: &[OsString],
        timeout: Duration,
    ) -> ProcessingResult<ProcessOutput> {
        let start = std::time::Instant::now();

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProcessingError::Spawn {
                program: program.to_string(),
                source,
            })?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::warn!(
                    timeout_secs = timeout.as_secs(),
                    "Process timed out and was killed"
                );
                return Err(ProcessingError::Timeout {
                    program: program.to_string(),
                    timeout,
                });
            }
        };

        tracing::debug!(
            exit_code = ?output.status.code(),
            duration_ms = start.elapsed().as_millis(),
            "Process finished"
        );

        Ok(ProcessOutput {
            exit_code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

use std::time::Duration;
use tubely_core::AppError;

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} did not finish within {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    #[error("ffprobe exited unsuccessfully: {stderr}")]
    ProbeFailed { stderr: String },

    #[error("Unusable ffprobe output: {0}")]
    ProbeParse(String),

    #[error("ffmpeg exited unsuccessfully: {stderr}")]
    TranscodeFailed { stderr: String },

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ProcessingResult<T> = Result<T, ProcessingError>;

impl From<ProcessingError> for AppError {
    fn from(err: ProcessingError) -> Self {
        match err {
            ProcessingError::ProbeFailed { stderr } => AppError::ProbeFailed(stderr),
            ProcessingError::ProbeParse(msg) => AppError::ProbeParse(msg),
            ProcessingError::TranscodeFailed { stderr } => AppError::TranscodeFailed(stderr),
            ProcessingError::UnsupportedMediaType(msg) => AppError::UnsupportedMediaType(msg),
            err @ (ProcessingError::Spawn { .. } | ProcessingError::Timeout { .. }) => {
                AppError::Internal(err.to_string())
            }
            ProcessingError::Io(err) => AppError::from(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubely_core::ErrorMetadata;

    #[test]
    fn tool_failures_keep_their_kind() {
        let probe: AppError = ProcessingError::ProbeFailed {
            stderr: "Invalid data found when processing input".into(),
        }
        .into();
        assert!(matches!(probe, AppError::ProbeFailed(ref s) if s.contains("Invalid data")));

        let transcode: AppError = ProcessingError::TranscodeFailed {
            stderr: "moov atom not found".into(),
        }
        .into();
        assert_eq!(transcode.http_status_code(), 500);
    }

    #[test]
    fn timeouts_are_internal() {
        let err: AppError = ProcessingError::Timeout {
            program: "ffmpeg".into(),
            timeout: Duration::from_secs(1),
        }
        .into();
        assert!(matches!(err, AppError::Internal(_)));
    }
}

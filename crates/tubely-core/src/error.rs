//! Error types module
//!
//! All request-level failures are unified under [`AppError`]. Each variant
//! describes its own HTTP presentation through [`ErrorMetadata`]; the API
//! crate only renders what the metadata says.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for failures caused by the uploaded content
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "PROBE_FAILED")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Media probe failed: {0}")]
    ProbeFailed(String),

    #[error("Could not read probe output: {0}")]
    ProbeParse(String),

    #[error("Transcode failed: {0}")]
    TranscodeFailed(String),

    #[error("Storage write failed: {0}")]
    StorageWriteFailed(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::BadRequest(_) => (
            400,
            "BAD_REQUEST",
            false,
            Some("Check request format and parameters"),
            false,
            LogLevel::Debug,
        ),
        AppError::Unauthenticated(_) => (
            401,
            "UNAUTHENTICATED",
            false,
            Some("Provide a valid bearer token"),
            false,
            LogLevel::Debug,
        ),
        AppError::Forbidden(_) => (
            403,
            "FORBIDDEN",
            false,
            None,
            false,
            LogLevel::Debug,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the video ID exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge(_) => (
            413,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Reduce file size"),
            false,
            LogLevel::Debug,
        ),
        AppError::UnsupportedMediaType(_) => (
            415,
            "UNSUPPORTED_MEDIA_TYPE",
            false,
            Some("Check the file's content type"),
            false,
            LogLevel::Debug,
        ),
        AppError::ProbeFailed(_) => (
            422,
            "PROBE_FAILED",
            false,
            Some("Upload a valid video file"),
            true,
            LogLevel::Warn,
        ),
        AppError::ProbeParse(_) => (
            422,
            "PROBE_PARSE_ERROR",
            false,
            Some("Upload a file with a readable video stream"),
            true,
            LogLevel::Warn,
        ),
        AppError::TranscodeFailed(_) => (
            500,
            "TRANSCODE_FAILED",
            false,
            Some("Contact support if this error persists"),
            true,
            LogLevel::Error,
        ),
        AppError::StorageWriteFailed(_) => (
            502,
            "STORAGE_WRITE_FAILED",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Database(_) => (
            500,
            "DATABASE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::BadRequest(msg)
            | AppError::Unauthenticated(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::UnsupportedMediaType(msg) => msg.clone(),
            AppError::ProbeFailed(_) => "Could not analyze the uploaded video".to_string(),
            AppError::ProbeParse(_) => "Uploaded file has no readable video stream".to_string(),
            AppError::TranscodeFailed(_) => "Failed to process the uploaded video".to_string(),
            AppError::StorageWriteFailed(_) => "Failed to store the uploaded file".to_string(),
            AppError::Database(_) => "A database error occurred".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "An internal error occurred".to_string()
            }
        }
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }
}

impl AppError {
    /// Variant name, used as `error_type` in logs and non-production responses.
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "BadRequest",
            AppError::Unauthenticated(_) => "Unauthenticated",
            AppError::Forbidden(_) => "Forbidden",
            AppError::NotFound(_) => "NotFound",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::UnsupportedMediaType(_) => "UnsupportedMediaType",
            AppError::ProbeFailed(_) => "ProbeFailed",
            AppError::ProbeParse(_) => "ProbeParseError",
            AppError::TranscodeFailed(_) => "TranscodeFailed",
            AppError::StorageWriteFailed(_) => "StorageWriteFailed",
            AppError::Database(_) => "Database",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Full internal message, including the source chain when present.
    pub fn detailed_message(&self) -> String {
        match self {
            AppError::InternalWithSource { message, source } => {
                format!("{}: {:#}", message, source)
            }
            other => other.to_string(),
        }
    }
}

//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Anything that converts into
//! [`AppError`] converts into [`HttpAppError`], so `?` works on repository,
//! storage and processing results alike and every failure renders the same
//! JSON body.

use axum::{
    extract::multipart::MultipartError,
    extract::multipart::MultipartRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tubely_core::{AppError, ErrorMetadata, LogLevel};
use tubely_processing::ProcessingError;
use tubely_storage::StorageError;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    /// Suggested action for the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rule: both the trait and AppError live in other crates).
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<ProcessingError> for HttpAppError {
    fn from(err: ProcessingError) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<MultipartRejection> for HttpAppError {
    fn from(rejection: MultipartRejection) -> Self {
        HttpAppError(AppError::BadRequest(format!(
            "Expected a multipart form: {}",
            rejection.body_text()
        )))
    }
}

/// A multipart stream error. Hitting the request body limit is reported as
/// `PayloadTooLarge`, everything else as a malformed request.
pub fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(format!("Failed to read multipart: {}", err.body_text()))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let detail = error.detailed_message();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %detail, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %detail, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %detail, error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let hide_details = is_production_env() || app_error.is_sensitive();
        let body = ErrorResponse {
            error: app_error.client_message(),
            details: (!hide_details).then(|| app_error.detailed_message()),
            error_type: (!hide_details).then(|| app_error.error_type().to_string()),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        };

        (status, Json(body)).into_response()
    }
}

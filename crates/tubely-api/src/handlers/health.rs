use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthCheckResponse {
    pub status: String,
    pub storage: String,
    pub storage_backend: String,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthCheckResponse),
        (status = 503, description = "Storage is unreachable", body = HealthCheckResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    const TIMEOUT: Duration = Duration::from_secs(5);

    // Lightweight exists check on a key that is never written.
    let storage = match tokio::time::timeout(TIMEOUT, state.storage.exists("health-check/none"))
        .await
    {
        Ok(Ok(_)) => "healthy".to_string(),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Storage health check failed");
            format!("unhealthy: {}", e)
        }
        Err(_) => {
            tracing::error!("Storage health check timed out");
            "timeout".to_string()
        }
    };

    let healthy = storage == "healthy";
    let response = HealthCheckResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        storage,
        storage_backend: state.storage.backend_type().to_string(),
    };

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}

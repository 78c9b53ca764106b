//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::Result;
use std::sync::Arc;
use tubely_core::Config;
use tubely_processing::TokioProcessRunner;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config.validate()?;

    crate::telemetry::init_telemetry(config.log_json)?;

    tracing::info!(
        environment = %config.environment,
        storage_backend = %config.storage_backend,
        "Configuration loaded and validated successfully"
    );

    let videos = database::setup_database(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    let state = Arc::new(AppState::new(
        config,
        videos,
        storage,
        Arc::new(TokioProcessRunner),
    ));

    let router = routes::setup_routes(state.clone());

    Ok((state, router))
}

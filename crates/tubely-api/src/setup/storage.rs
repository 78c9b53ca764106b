//! Storage setup

use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_storage::{create_storage, Storage};

/// Create the video storage backend and make sure the asset root exists.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tokio::fs::create_dir_all(&config.assets_root)
        .await
        .with_context(|| {
            format!(
                "Failed to create assets directory {}",
                config.assets_root.display()
            )
        })?;

    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;

    tracing::info!(
        backend = %storage.backend_type(),
        assets_root = %config.assets_root.display(),
        "Storage initialized"
    );

    Ok(storage)
}

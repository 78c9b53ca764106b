//! Storage factory for creating storage backends based on configuration

use crate::local::LocalStorage;
use crate::object::ObjectStorage;
use crate::traits::{Storage, StorageError, StorageResult};
use std::sync::Arc;
use tubely_core::{Config, StorageBackend};

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend {
        StorageBackend::S3 => {
            let settings = config.s3.as_ref().ok_or_else(|| {
                StorageError::ConfigError(
                    "S3_BUCKET and S3_REGION are required for the S3 backend".to_string(),
                )
            })?;

            tracing::info!(
                bucket = %settings.bucket,
                region = %settings.region,
                endpoint = ?settings.endpoint,
                "Initializing S3 storage backend"
            );

            Ok(Arc::new(ObjectStorage::s3(settings)?))
        }
        StorageBackend::Local => {
            let settings = config.local_storage.as_ref().ok_or_else(|| {
                StorageError::ConfigError(
                    "LOCAL_STORAGE_PATH is required for the local backend".to_string(),
                )
            })?;

            tracing::info!(
                path = %settings.path.display(),
                base_url = %settings.base_url,
                "Initializing local storage backend"
            );

            Ok(Arc::new(
                LocalStorage::new(settings.path.clone(), settings.base_url.clone()).await?,
            ))
        }
    }
}

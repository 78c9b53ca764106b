use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tubely_core::StorageBackend;
use uuid::Uuid;

/// Local filesystem storage implementation
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/tubely/media")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:8091/media")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.base_path.join(key))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload_file(
        &self,
        local_path: &Path,
        key: &str,
        _content_type: &str,
    ) -> StorageResult<String> {
        let path = self.key_to_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let start = std::time::Instant::now();

        // Copy next to the destination, then rename so readers never see a partial file.
        let partial = path.with_extension(format!("{}.part", Uuid::new_v4().simple()));
        let copied = async {
            let size = fs::copy(local_path, &partial).await?;
            fs::File::open(&partial).await?.sync_all().await?;
            fs::rename(&partial, &path).await?;
            Ok::<u64, std::io::Error>(size)
        }
        .await;

        let size = match copied {
            Ok(size) => size,
            Err(e) => {
                if let Err(cleanup_err) = fs::remove_file(&partial).await {
                    tracing::debug!(error = %cleanup_err, path = %partial.display(), "No partial file to remove");
                }
                return Err(StorageError::UploadFailed(format!(
                    "Failed to write {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(key.to_string())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(key)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.key_to_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

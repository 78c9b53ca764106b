//! Storage doubles for failure paths.

use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tubely_core::StorageBackend;
use tubely_storage::{Storage, StorageError, StorageResult};

/// Rejects every upload, as an unreachable bucket would.
pub struct FailingStorage;

#[async_trait]
impl Storage for FailingStorage {
    async fn upload_file(
        &self,
        _local_path: &Path,
        _key: &str,
        _content_type: &str,
    ) -> StorageResult<String> {
        Err(StorageError::UploadFailed(
            "connection reset by peer".to_string(),
        ))
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://unreachable.example.com/{}", key)
    }

    async fn exists(&self, _key: &str) -> StorageResult<bool> {
        Err(StorageError::BackendError("unreachable".to_string()))
    }

    async fn delete(&self, _key: &str) -> StorageResult<()> {
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

/// Delegates to another backend and remembers deleted keys.
pub struct RecordingStorage {
    inner: Arc<dyn Storage>,
    deleted: Mutex<Vec<String>>,
}

impl RecordingStorage {
    pub fn new(inner: Arc<dyn Storage>) -> Self {
        Self {
            inner,
            deleted: Mutex::new(Vec::new()),
        }
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    async fn upload_file(
        &self,
        local_path: &Path,
        key: &str,
        content_type: &str,
    ) -> StorageResult<String> {
        self.inner.upload_file(local_path, key, content_type).await
    }

    fn public_url(&self, key: &str) -> String {
        self.inner.public_url(key)
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        self.inner.exists(key).await
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.deleted.lock().unwrap().push(key.to_string());
        self.inner.delete(key).await
    }

    fn backend_type(&self) -> StorageBackend {
        self.inner.backend_type()
    }
}

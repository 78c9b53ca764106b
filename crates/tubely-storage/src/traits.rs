//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;
use tubely_core::{AppError, StorageBackend};

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UploadFailed(msg) => AppError::StorageWriteFailed(msg),
            StorageError::DeleteFailed(msg) => AppError::StorageWriteFailed(msg),
            StorageError::BackendError(msg) => AppError::StorageWriteFailed(msg),
            StorageError::IoError(err) => AppError::StorageWriteFailed(format!("IO error: {}", err)),
            StorageError::InvalidKey(msg) => AppError::Internal(msg),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        }
    }
}

/// Storage abstraction trait
///
/// Uploads are all-or-nothing from the caller's point of view: when
/// `upload_file` returns `Ok` the object is complete at `key`, when it returns
/// `Err` nothing is visible at `key` that was not there before.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Stream a local file to `key` with the given content type. Returns the key.
    ///
    /// Uploading to an existing key overwrites it.
    async fn upload_file(
        &self,
        local_path: &Path,
        key: &str,
        content_type: &str,
    ) -> StorageResult<String>;

    /// Public URL under which the object at `key` is served.
    fn public_url(&self, key: &str) -> String;

    /// Check if an object exists
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Delete an object. Deleting a missing object is not an error.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use object_store::aws::AmazonS3Builder;
use object_store::buffered::BufWriter;
use object_store::path::Path as ObjectPath;
use object_store::Error as ObjectStoreError;
use object_store::{Attribute, Attributes, ObjectStore, ObjectStoreExt};
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tubely_core::config::S3Settings;
use tubely_core::StorageBackend;

/// Object storage implementation over any `object_store` backend.
///
/// Production uses Amazon S3 (or an S3-compatible endpoint); tests plug in
/// `object_store::memory::InMemory`.
#[derive(Clone)]
pub struct ObjectStorage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
}

impl ObjectStorage {
    /// Create an S3-backed instance.
    ///
    /// Credentials come from the standard AWS environment variables.
    pub fn s3(settings: &S3Settings) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(settings.region.clone())
            .with_bucket_name(settings.bucket.clone());

        if let Some(ref endpoint) = settings.endpoint {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(Self::from_store(Arc::new(store), settings))
    }

    /// Wrap an already-built store. URLs are still derived from `settings`.
    pub fn from_store(store: Arc<dyn ObjectStore>, settings: &S3Settings) -> Self {
        ObjectStorage {
            store,
            bucket: settings.bucket.clone(),
            region: settings.region.clone(),
            endpoint_url: settings.endpoint.clone(),
        }
    }

    /// The underlying object store.
    pub fn inner(&self) -> Arc<dyn ObjectStore> {
        Arc::clone(&self.store)
    }
}

#[async_trait]
impl Storage for ObjectStorage {
    async fn upload_file(
        &self,
        local_path: &Path,
        key: &str,
        content_type: &str,
    ) -> StorageResult<String> {
        validate_key(key)?;
        let start = std::time::Instant::now();

        let mut file = tokio::fs::File::open(local_path).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to open {}: {}",
                local_path.display(),
                e
            ))
        })?;

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());

        // Multipart upload; nothing is visible at `key` until shutdown completes it.
        let mut writer =
            BufWriter::new(Arc::clone(&self.store), ObjectPath::from(key)).with_attributes(attributes);

        let copied = tokio::io::copy(&mut file, &mut writer).await;
        let result = match copied {
            Ok(size) => writer.shutdown().await.map(|_| size),
            Err(e) => Err(e),
        };

        let size = match result {
            Ok(size) => size,
            Err(e) => {
                if let Err(abort_err) = writer.abort().await {
                    tracing::debug!(error = %abort_err, key = %key, "Failed to abort upload");
                }
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Object upload failed"
                );
                return Err(StorageError::UploadFailed(e.to_string()));
            }
        };

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            content_type = %content_type,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object upload successful"
        );

        Ok(key.to_string())
    }

    /// For AWS S3, uses the standard format: https://{bucket}.s3.{region}.amazonaws.com/{key}
    /// For S3-compatible providers, uses path-style URLs on the endpoint.
    fn public_url(&self, key: &str) -> String {
        if let Some(ref endpoint) = self.endpoint_url {
            let base_url = endpoint.trim_end_matches('/');
            format!("{}/{}/{}", base_url, self.bucket, key)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            )
        }
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        validate_key(key)?;
        match self.store.head(&ObjectPath::from(key)).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;
        match self.store.delete(&ObjectPath::from(key)).await {
            Ok(()) | Err(ObjectStoreError::NotFound { .. }) => Ok(()),
            Err(e) => {
                tracing::error!(error = %e, bucket = %self.bucket, key = %key, "Object delete failed");
                Err(StorageError::DeleteFailed(e.to_string()))
            }
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

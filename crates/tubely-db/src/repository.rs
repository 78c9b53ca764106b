use async_trait::async_trait;
use tubely_core::models::VideoRecord;
use tubely_core::AppError;
use uuid::Uuid;

/// Per-record atomic read/update over the video table.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Load one record, `None` when the id is unknown.
    async fn get_video(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError>;

    /// Persist the URL fields of `video` and return the stored record.
    ///
    /// Ownership and the descriptive fields are never written here.
    async fn update_video(&self, video: &VideoRecord) -> Result<VideoRecord, AppError>;
}

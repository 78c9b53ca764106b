//! Repository double whose writes fail.

use async_trait::async_trait;
use tubely_core::models::VideoRecord;
use tubely_core::AppError;
use tubely_db::{InMemoryVideoRepository, VideoRepository};
use uuid::Uuid;

/// Reads from the wrapped store; every update fails like a dropped connection.
pub struct RejectingUpdates {
    inner: InMemoryVideoRepository,
}

impl RejectingUpdates {
    pub fn new(inner: InMemoryVideoRepository) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl VideoRepository for RejectingUpdates {
    async fn get_video(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError> {
        self.inner.get_video(id).await
    }

    async fn update_video(&self, _video: &VideoRecord) -> Result<VideoRecord, AppError> {
        Err(AppError::Database("connection closed".to_string()))
    }
}

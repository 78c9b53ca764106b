use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tubely_core::models::VideoRecord;
use tubely_core::AppError;
use uuid::Uuid;

use crate::repository::VideoRepository;

/// Process-local store used when no `DATABASE_URL` is configured.
#[derive(Clone, Default)]
pub struct InMemoryVideoRepository {
    videos: Arc<RwLock<HashMap<Uuid, VideoRecord>>>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, video: VideoRecord) {
        self.videos.write().await.insert(video.id, video);
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn get_video(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError> {
        Ok(self.videos.read().await.get(&id).cloned())
    }

    async fn update_video(&self, video: &VideoRecord) -> Result<VideoRecord, AppError> {
        let mut videos = self.videos.write().await;
        let stored = videos
            .get_mut(&video.id)
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video.id)))?;

        stored.thumbnail_url = video.thumbnail_url.clone();
        stored.video_url = video.video_url.clone();
        stored.updated_at = Utc::now();

        Ok(stored.clone())
    }
}

use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use tubely_core::models::VideoRecord;
use tubely_core::AppError;
use uuid::Uuid;

use crate::repository::VideoRepository;

#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.record_id = %id))]
    async fn get_video(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError> {
        let row = sqlx::query_as::<Postgres, VideoRecord>("SELECT * FROM videos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    #[tracing::instrument(skip(self, video), fields(db.table = "videos", db.record_id = %video.id))]
    async fn update_video(&self, video: &VideoRecord) -> Result<VideoRecord, AppError> {
        let row = sqlx::query_as::<Postgres, VideoRecord>(
            r#"
            UPDATE videos
            SET thumbnail_url = $2, video_url = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(video.id)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| AppError::NotFound(format!("Video {} not found", video.id)))
    }
}

use super::jwt::{bearer_token, validate_jwt};
use axum::http::HeaderMap;
use std::sync::Arc;
use tubely_core::models::VideoRecord;
use tubely_core::AppError;
use tubely_db::VideoRepository;
use uuid::Uuid;

/// A caller who owns the video they are uploading to.
#[derive(Debug, Clone)]
pub struct Authorized {
    pub video: VideoRecord,
    pub user_id: Uuid,
}

/// Decides whether a caller may attach media to a video. Read-only.
#[derive(Clone)]
pub struct UploadAuthorizer {
    videos: Arc<dyn VideoRepository>,
    jwt_secret: String,
}

impl UploadAuthorizer {
    pub fn new(videos: Arc<dyn VideoRepository>, jwt_secret: String) -> Self {
        Self { videos, jwt_secret }
    }

    /// The token is validated before the record is looked up, so an
    /// unauthenticated caller learns nothing about which videos exist.
    pub async fn authorize(
        &self,
        headers: &HeaderMap,
        video_id: Uuid,
    ) -> Result<Authorized, AppError> {
        let token = bearer_token(headers)?;
        let user_id = validate_jwt(token, &self.jwt_secret)?;

        let video = self
            .videos
            .get_video(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

        if !video.is_owned_by(user_id) {
            tracing::debug!(
                video_id = %video_id,
                user_id = %user_id,
                owner_id = %video.user_id,
                "Upload rejected: caller does not own the video"
            );
            return Err(AppError::Forbidden(
                "User cannot upload media for another user's video".to_string(),
            ));
        }

        Ok(Authorized { video, user_id })
    }
}

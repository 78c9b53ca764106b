pub mod health;
pub mod thumbnail_upload;
pub mod video_upload;

use tubely_core::AppError;
use uuid::Uuid;

/// Path segment to video ID.
pub(crate) fn parse_video_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest("Invalid video ID".to_string()))
}

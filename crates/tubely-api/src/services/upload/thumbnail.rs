//! Thumbnail uploads: validate, stage, move into the public asset directory,
//! update the record. No probing or remote storage.

use super::intake::{stage_upload, UploadField};
use super::{remove_working_dir, working_dir};
use crate::auth::Authorized;
use crate::state::AppState;
use axum::extract::Multipart;
use std::sync::Arc;
use tubely_core::constants::THUMBNAIL_FIELD;
use tubely_core::models::VideoRecord;
use tubely_core::AppError;
use tubely_processing::MediaTypeRule;

pub struct ThumbnailUpload {
    state: Arc<AppState>,
}

impl ThumbnailUpload {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn run(
        &self,
        authorized: Authorized,
        mut multipart: Multipart,
    ) -> Result<VideoRecord, AppError> {
        let config = &self.state.config;
        let video_id = authorized.video.id;

        let field = UploadField {
            name: THUMBNAIL_FIELD,
            label: "Thumbnail",
            max_bytes: config.max_thumbnail_size_bytes,
            media_type: MediaTypeRule::AnyImage,
        };

        let workdir = working_dir(&config.assets_root).await?;
        let staged = stage_upload(&mut multipart, &field, workdir.path()).await?;

        // Same filesystem, so the rename is atomic: the asset is either absent or complete.
        let file_name = format!("{}.{}", staged.name, staged.extension);
        let asset_path = config.assets_root.join(&file_name);
        tokio::fs::rename(&staged.path, &asset_path).await?;

        remove_working_dir(workdir).await;

        let url = format!(
            "{}/{}",
            config.assets_base_url.trim_end_matches('/'),
            file_name
        );

        let updated = match self
            .state
            .videos
            .update_video(&authorized.video.with_thumbnail_url(url))
            .await
        {
            Ok(updated) => updated,
            Err(e) => {
                if let Err(cleanup_err) = tokio::fs::remove_file(&asset_path).await {
                    tracing::debug!(
                        error = %cleanup_err,
                        path = %asset_path.display(),
                        "Failed to remove thumbnail after record update error"
                    );
                }
                return Err(e);
            }
        };

        tracing::info!(
            video_id = %video_id,
            user_id = %authorized.user_id,
            media_type = %staged.media_type,
            size_bytes = staged.size,
            "Thumbnail upload completed"
        );

        Ok(updated)
    }
}

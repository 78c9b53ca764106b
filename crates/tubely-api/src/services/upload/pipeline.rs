//! Video upload pipeline.
//!
//! ```text
//! Authorized -> Staged -> Probed -> Transcoded -> Uploaded -> RecordUpdated
//! ```
//!
//! Every step runs in order inside the request. Local artifacts live in one
//! working directory under the asset root which is removed on every exit
//! path, including when the request future is dropped. The record is updated
//! once, after the object is fully stored.

use super::intake::{stage_upload, UploadField};
use super::{remove_working_dir, working_dir};
use crate::auth::Authorized;
use crate::state::AppState;
use axum::extract::Multipart;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;
use tubely_core::constants::VIDEO_FIELD;
use tubely_core::models::VideoRecord;
use tubely_core::AppError;
use tubely_processing::MediaTypeRule;
use tubely_storage::video_key;

/// Last step a video upload completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Authorized,
    Staged,
    Probed,
    Transcoded,
    Uploaded,
    RecordUpdated,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Authorized => "authorized",
            PipelineStage::Staged => "staged",
            PipelineStage::Probed => "probed",
            PipelineStage::Transcoded => "transcoded",
            PipelineStage::Uploaded => "uploaded",
            PipelineStage::RecordUpdated => "record_updated",
        }
    }
}

impl Display for PipelineStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

pub struct UploadPipeline {
    state: Arc<AppState>,
}

impl UploadPipeline {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    fn field(&self) -> UploadField {
        UploadField {
            name: VIDEO_FIELD,
            label: "Video",
            max_bytes: self.state.config.max_video_size_bytes,
            media_type: MediaTypeRule::Exact(self.state.config.video_content_type.clone()),
        }
    }

    /// Run the pipeline for an authorized caller and return the updated record.
    pub async fn run(
        &self,
        authorized: Authorized,
        mut multipart: Multipart,
    ) -> Result<VideoRecord, AppError> {
        let video_id = authorized.video.id;
        let start = std::time::Instant::now();
        let mut stage = PipelineStage::Authorized;
        advance(&mut stage, PipelineStage::Authorized, video_id);

        let result = self.execute(authorized, &mut multipart, &mut stage).await;

        match &result {
            Ok(video) => tracing::info!(
                video_id = %video_id,
                video_url = ?video.video_url,
                duration_ms = start.elapsed().as_millis(),
                "Video upload completed"
            ),
            Err(err) => tracing::warn!(
                video_id = %video_id,
                stage = %stage,
                error_type = err.error_type(),
                duration_ms = start.elapsed().as_millis(),
                "Video upload failed"
            ),
        }

        result
    }

    async fn execute(
        &self,
        authorized: Authorized,
        multipart: &mut Multipart,
        stage: &mut PipelineStage,
    ) -> Result<VideoRecord, AppError> {
        let state = &self.state;
        let video_id = authorized.video.id;

        let workdir = working_dir(&state.config.assets_root).await?;

        let staged = stage_upload(multipart, &self.field(), workdir.path()).await?;
        advance(stage, PipelineStage::Staged, video_id);

        let aspect = state.probe.probe(&staged.path).await?;
        advance(stage, PipelineStage::Probed, video_id);

        let transcoded = state.transcoder.optimize_for_streaming(&staged.path).await?;
        if let Err(e) = tokio::fs::remove_file(&staged.path).await {
            tracing::debug!(error = %e, path = %staged.path.display(), "Failed to remove staged upload");
        }
        advance(stage, PipelineStage::Transcoded, video_id);

        let key = video_key(aspect, &staged.name);
        state
            .storage
            .upload_file(&transcoded.path, &key, &staged.media_type)
            .await?;
        advance(stage, PipelineStage::Uploaded, video_id);

        let url = state.storage.public_url(&key);
        let updated = match state
            .videos
            .update_video(&authorized.video.with_video_url(url))
            .await
        {
            Ok(updated) => updated,
            Err(e) => {
                if let Err(cleanup_err) = state.storage.delete(&key).await {
                    tracing::warn!(
                        error = %cleanup_err,
                        key = %key,
                        "Failed to remove stored video after record update error"
                    );
                }
                remove_working_dir(workdir).await;
                return Err(e);
            }
        };
        advance(stage, PipelineStage::RecordUpdated, video_id);

        remove_working_dir(workdir).await;

        Ok(updated)
    }
}

fn advance(current: &mut PipelineStage, next: PipelineStage, video_id: uuid::Uuid) {
    *current = next;
    tracing::debug!(video_id = %video_id, stage = %next, "Upload stage reached");
}

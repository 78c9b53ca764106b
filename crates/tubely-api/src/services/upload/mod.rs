//! Upload services shared by the video and thumbnail endpoints.

pub mod intake;
pub mod pipeline;
pub mod thumbnail;

pub use intake::{random_name, stage_upload, StagedFile, UploadField};
pub use pipeline::{PipelineStage, UploadPipeline};
pub use thumbnail::ThumbnailUpload;

use std::path::Path;
use tempfile::TempDir;
use tubely_core::AppError;

/// Per-upload scratch directory inside the asset root, removed when dropped.
///
/// Kept on the same filesystem as the assets so finished files can be renamed
/// into place.
pub(crate) async fn working_dir(assets_root: &Path) -> Result<TempDir, AppError> {
    tokio::fs::create_dir_all(assets_root).await?;
    let root = assets_root.to_path_buf();
    tokio::task::spawn_blocking(move || {
        tempfile::Builder::new()
            .prefix(".upload-")
            .tempdir_in(root)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Working directory task failed: {}", e)))?
    .map_err(AppError::from)
}

/// Remove a working directory off the async workers. Failures are logged only.
pub(crate) async fn remove_working_dir(dir: TempDir) {
    let path = dir.path().to_path_buf();
    match tokio::task::spawn_blocking(move || dir.close()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::warn!(error = %e, path = %path.display(), "Failed to remove upload working directory")
        }
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "Working directory removal task failed")
        }
    }
}

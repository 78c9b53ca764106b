//! Streaming a multipart file part onto local disk.

use crate::error::multipart_error;
use axum::extract::multipart::{Field, Multipart};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tubely_core::constants::RANDOM_NAME_BYTES;
use tubely_core::AppError;
use tubely_processing::MediaTypeRule;

/// What a single upload endpoint accepts.
#[derive(Debug, Clone)]
pub struct UploadField {
    /// Multipart field name.
    pub name: &'static str,
    /// Human-readable label used in error messages ("Video", "Thumbnail").
    pub label: &'static str,
    pub max_bytes: usize,
    pub media_type: MediaTypeRule,
}

/// An upload written to local disk under a random name.
#[derive(Debug, Clone)]
pub struct StagedFile {
    pub path: PathBuf,
    /// Random hex name, without extension.
    pub name: String,
    pub extension: String,
    pub media_type: String,
    pub size: u64,
}

/// `RANDOM_NAME_BYTES` random bytes, hex encoded.
pub fn random_name() -> String {
    let bytes: [u8; RANDOM_NAME_BYTES] = rand::random();
    hex::encode(bytes)
}

/// Find `spec.name` in the form and stream it into `dir`.
///
/// The declared media type is checked before anything is written. Parts with
/// other names are skipped. On error the partially written file is removed.
pub async fn stage_upload(
    multipart: &mut Multipart,
    spec: &UploadField,
    dir: &Path,
) -> Result<StagedFile, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(spec.name) {
            continue;
        }

        if field.file_name().is_none() {
            return Err(AppError::BadRequest(format!("{} file missing", spec.label)));
        }

        let (media_type, extension) = spec.media_type.check(field.content_type())?;

        let name = random_name();
        let path = dir.join(format!("{}.{}", name, extension));

        let size = match write_field(field, &path, spec).await {
            Ok(size) => size,
            Err(err) => {
                if let Err(e) = tokio::fs::remove_file(&path).await {
                    tracing::debug!(error = %e, path = %path.display(), "No partial upload to remove");
                }
                return Err(err);
            }
        };

        tracing::debug!(
            field = spec.name,
            media_type = %media_type,
            size_bytes = size,
            path = %path.display(),
            "Upload staged"
        );

        return Ok(StagedFile {
            path,
            name,
            extension,
            media_type,
            size,
        });
    }

    Err(AppError::BadRequest(format!("{} file missing", spec.label)))
}

async fn write_field(
    mut field: Field<'_>,
    path: &Path,
    spec: &UploadField,
) -> Result<u64, AppError> {
    let mut file = File::create(path).await?;
    let mut total: usize = 0;

    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        total = total.saturating_add(chunk.len());
        if total > spec.max_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "{} size exceeds the {} byte upload limit",
                spec.label, spec.max_bytes
            )));
        }
        file.write_all(&chunk).await?;
    }

    if total == 0 {
        return Err(AppError::BadRequest(format!("{} file is empty", spec.label)));
    }

    file.flush().await?;
    file.sync_all().await?;

    Ok(total as u64)
}

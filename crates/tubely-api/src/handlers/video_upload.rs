use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::parse_video_id;
use crate::services::upload::UploadPipeline;
use crate::state::AppState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::HeaderMap,
    Json,
};
use std::sync::Arc;
use tubely_core::models::VideoRecord;

#[utoipa::path(
    post,
    path = "/api/videos/{videoID}/video",
    tag = "videos",
    params(
        ("videoID" = String, Path, description = "ID of the video to attach the upload to")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Form with a `video` file part"),
    responses(
        (status = 200, description = "Video processed and stored", body = VideoRecord),
        (status = 400, description = "Invalid video ID or malformed form", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 415, description = "Unsupported media type", body = ErrorResponse),
        (status = 422, description = "File has no readable video stream", body = ErrorResponse),
        (status = 500, description = "Processing failed", body = ErrorResponse),
        (status = 502, description = "Object storage write failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<VideoRecord>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let authorized = state.authorizer.authorize(&headers, video_id).await?;

    tracing::info!(
        video_id = %video_id,
        user_id = %authorized.user_id,
        "Uploading video"
    );

    let multipart = multipart?;
    let updated = UploadPipeline::new(state.clone())
        .run(authorized, multipart)
        .await?;

    Ok(Json(updated))
}

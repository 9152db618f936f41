//! Direct video upload and S3 video processing handlers.

use axum::extract::{Multipart, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use vsum_summarizer::{run_s3, run_upload, S3Request, UploadRequest};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::streaming::ndjson_response;

/// Multipart field carrying the uploaded video.
const VIDEO_FIELD: &str = "video";

/// Summarize a video posted as multipart form data, streaming progress as NDJSON.
///
/// The file body is streamed through to learn its size; its content is not transcribed.
pub async fn process_video(State(state): State<AppState>, mut multipart: Multipart) -> ApiResult<Response> {
    let mut upload = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);

        let mut size: u64 = 0;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read uploaded file: {}", e)))?
        {
            size += chunk.len() as u64;
        }

        info!(file_name = ?file_name, content_type = ?content_type, size, "Received video upload");
        upload = Some(UploadRequest {
            file_name,
            size_bytes: Some(size),
        });
        break;
    }

    let request = upload.ok_or_else(|| ApiError::bad_request("No video file provided"))?;
    let deps = state.pipeline.clone();

    Ok(ndjson_response("upload", move |sink| async move {
        run_upload(&deps, &request, &sink).await
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessS3VideoRequest {
    #[serde(default)]
    pub s3_key: String,
    #[serde(default)]
    pub file_name: String,
}

/// Summarize a video previously uploaded to S3, streaming progress as NDJSON.
pub async fn process_s3_video(
    State(state): State<AppState>,
    Json(request): Json<ProcessS3VideoRequest>,
) -> ApiResult<Response> {
    if request.s3_key.trim().is_empty() || request.file_name.trim().is_empty() {
        return Err(ApiError::bad_request("Missing required fields: s3Key, fileName"));
    }

    info!(s3_key = %request.s3_key, file_name = %request.file_name, "Processing S3 video");

    let deps = state.pipeline.clone();
    let request = S3Request {
        s3_key: request.s3_key,
        file_name: request.file_name,
    };

    Ok(ndjson_response("s3", move |sink| async move { run_s3(&deps, &request, &sink).await }))
}

//! Presigned S3 upload handler.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use vsum_storage::{new_upload_key, S3Config, PRESIGNED_UPLOAD_EXPIRY};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Largest file a browser may upload (500 MB).
pub const MAX_UPLOAD_SIZE: u64 = 500 * 1024 * 1024;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUploadRequest {
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub file_size: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUploadResponse {
    pub success: bool,
    pub upload_url: String,
    pub key: String,
}

impl PresignedUploadRequest {
    fn validate(&self) -> ApiResult<()> {
        if self.file_name.is_empty() || self.file_type.is_empty() || self.file_size == 0 {
            return Err(ApiError::bad_request("Missing required fields: fileName, fileType, fileSize"));
        }
        if !self.file_type.starts_with("video/") {
            return Err(ApiError::bad_request("Only video files are allowed"));
        }
        if self.file_size > MAX_UPLOAD_SIZE {
            return Err(ApiError::bad_request("File size too large. Maximum 500MB allowed."));
        }
        Ok(())
    }
}

/// Issue a presigned PUT URL so the browser can upload straight to S3.
pub async fn create_presigned_upload(
    State(state): State<AppState>,
    Json(request): Json<PresignedUploadRequest>,
) -> ApiResult<Json<PresignedUploadResponse>> {
    request.validate()?;

    let storage = state.storage.as_ref().ok_or_else(|| {
        let missing = S3Config::missing_vars();
        if missing.is_empty() {
            ApiError::internal("S3 storage is not configured")
        } else {
            ApiError::StorageNotConfigured(missing.into_iter().map(str::to_string).collect())
        }
    })?;

    let (key, timestamp_ms) = new_upload_key(&request.file_name);
    let metadata = [
        ("original-name", request.file_name.clone()),
        ("file-size", request.file_size.to_string()),
        ("upload-timestamp", timestamp_ms.to_string()),
    ];

    let upload_url = storage
        .presign_put(&key, &request.file_type, &metadata, PRESIGNED_UPLOAD_EXPIRY)
        .await?;

    info!(key = %key, size = request.file_size, "Issued presigned upload URL");

    Ok(Json(PresignedUploadResponse {
        success: true,
        upload_url,
        key,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(file_type: &str, file_size: u64) -> PresignedUploadRequest {
        PresignedUploadRequest {
            file_name: "talk.mp4".to_string(),
            file_type: file_type.to_string(),
            file_size,
        }
    }

    #[test]
    fn test_validate() {
        assert!(request("video/mp4", 10).validate().is_ok());
        assert!(request("video/mp4", MAX_UPLOAD_SIZE).validate().is_ok());

        let err = request("image/png", 10).validate().unwrap_err();
        assert_eq!(err.to_string(), "Only video files are allowed");

        let err = request("video/mp4", MAX_UPLOAD_SIZE + 1).validate().unwrap_err();
        assert_eq!(err.to_string(), "File size too large. Maximum 500MB allowed.");

        let err = request("video/mp4", 0).validate().unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields: fileName, fileType, fileSize");
    }
}

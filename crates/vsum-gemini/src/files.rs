//! Gemini Files API: resumable upload, status polling, deletion.

use reqwest::header::CONTENT_TYPE;
use tokio::time::{sleep, Instant};
use tracing::{error, info, warn};

use crate::client::GeminiClient;
use crate::error::{GeminiError, GeminiResult};
use crate::types::{FileState, GeminiFile, UploadFileResponse};

const UPLOAD_URL_HEADER: &str = "x-goog-upload-url";

impl GeminiClient {
    /// Upload bytes with the two-step resumable protocol and return the
    /// created file (usually still `PROCESSING`).
    pub async fn upload_file(
        &self,
        bytes: Vec<u8>,
        display_name: &str,
        mime_type: &str,
    ) -> GeminiResult<GeminiFile> {
        let size = bytes.len();
        info!(display_name = %display_name, size, mime_type = %mime_type, "Starting resumable upload");

        let start_url = format!("{}/upload/v1beta/files", self.config.base_url);
        let metadata = serde_json::json!({ "file": { "display_name": display_name } });

        let init = self
            .http
            .post(&start_url)
            .query(&[("key", self.config.api_key.as_str())])
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", size.to_string())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .header(CONTENT_TYPE, "application/json")
            .json(&metadata)
            .send()
            .await
            .map_err(|e| GeminiError::upload_failed(format!("Failed to upload to Google Files API: {}", e)))?;

        let status = init.status();
        if !status.is_success() {
            let error_text = init.text().await.unwrap_or_default();
            error!(status = status.as_u16(), error = %error_text, "Failed to initiate resumable upload");
            return Err(GeminiError::upload_failed(format!(
                "Failed to initiate upload: {} - {}",
                status.as_u16(),
                error_text
            )));
        }

        let upload_url = init
            .headers()
            .get(UPLOAD_URL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| GeminiError::upload_failed("No upload URL received from Google Files API"))?;

        let response = self
            .http
            .post(&upload_url)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(bytes)
            .send()
            .await
            .map_err(|e| GeminiError::upload_failed(format!("Failed to upload file data: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), error = %error_text, "Failed to upload file data");
            return Err(GeminiError::upload_failed(format!(
                "Failed to upload file data: {} - {}",
                status.as_u16(),
                error_text
            )));
        }

        let body: UploadFileResponse = response.json().await?;
        let file = body
            .file
            .filter(|f| !f.name.is_empty() && !f.uri.is_empty())
            .ok_or_else(|| GeminiError::upload_failed("Google Files API returned unexpected response format"))?;

        info!(name = %file.name, uri = %file.uri, state = ?file.state, "File uploaded to Google Files API");
        Ok(file)
    }

    /// Fetch a file resource by name (`files/...`).
    pub async fn get_file(&self, name: &str) -> GeminiResult<GeminiFile> {
        let response = self
            .http
            .get(self.api_url(name))
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GeminiError::api(
                status.as_u16(),
                format!("Failed to check file status: {}", error_text),
            ));
        }

        Ok(response.json().await?)
    }

    /// Poll until the file is `ACTIVE`, failing on `FAILED` or after the
    /// configured processing timeout.
    pub async fn wait_until_active(&self, name: &str) -> GeminiResult<GeminiFile> {
        let deadline = Instant::now() + self.config.processing_timeout;

        while Instant::now() < deadline {
            let file = self.get_file(name).await?;
            match file.state {
                FileState::Active => {
                    info!(name = %name, "File processing completed");
                    return Ok(file);
                }
                FileState::Failed => return Err(GeminiError::ProcessingFailed),
                state => {
                    info!(
                        name = %name,
                        state = ?state,
                        "File not ready, waiting {:?} before next check",
                        self.config.poll_interval
                    );
                    sleep(self.config.poll_interval).await;
                }
            }
        }

        Err(GeminiError::ProcessingTimeout(
            self.config.processing_timeout.as_secs(),
        ))
    }

    /// Delete a file. Failures are logged and swallowed.
    pub async fn delete_file(&self, name: &str) {
        let result = self
            .http
            .delete(self.api_url(name))
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                info!(name = %name, "Deleted file from Google Files API");
            }
            Ok(response) => {
                let status = response.status().as_u16();
                let error_text = response.text().await.unwrap_or_default();
                warn!(name = %name, status, error = %error_text, "Failed to delete file from Google Files API");
            }
            Err(e) => {
                warn!(name = %name, error = %e, "Error deleting file from Google Files API");
            }
        }
    }
}

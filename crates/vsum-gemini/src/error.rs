//! Gemini error types.

use thiserror::Error;

/// Result type for Gemini operations.
pub type GeminiResult<T> = Result<T, GeminiError>;

/// Errors that can occur while talking to Gemini.
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("{0}")]
    ConfigError(String),

    #[error("Gemini API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("No content in Gemini response")]
    EmptyResponse,

    #[error("{0}")]
    UploadFailed(String),

    #[error("File processing failed on Google servers")]
    ProcessingFailed,

    #[error("File processing timeout after {0} seconds")]
    ProcessingTimeout(u64),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GeminiError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn upload_failed(msg: impl Into<String>) -> Self {
        Self::UploadFailed(msg.into())
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}

//! Pipeline error types.

use thiserror::Error;

use vsum_gemini::GeminiError;
use vsum_storage::StorageError;
use vsum_supabase::SupabaseError;

pub type SummarizerResult<T> = Result<T, SummarizerError>;

/// Message shown when a summary could not be persisted.
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save summary to database";

#[derive(Debug, Error)]
pub enum SummarizerError {
    /// Bad client input (unparseable URL, missing fields)
    #[error("{0}")]
    InvalidInput(String),

    /// Transcript could not be obtained; message is user-facing
    #[error("{0}")]
    Transcript(String),

    /// A required backing service is not configured
    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("Failed to generate summary: {0}")]
    AiFailed(String),

    #[error("{}", SAVE_FAILED_MESSAGE)]
    Persistence(String),

    #[error(transparent)]
    Gemini(#[from] GeminiError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Database error: {0}")]
    Database(#[from] SupabaseError),
}

impl SummarizerError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn transcript(msg: impl Into<String>) -> Self {
        Self::Transcript(msg.into())
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::ServiceUnavailable(msg.into())
    }

    pub fn ai_failed(msg: impl Into<String>) -> Self {
        Self::AiFailed(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// True for failures caused by the request itself (HTTP 400 semantics).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::Transcript(_))
    }
}

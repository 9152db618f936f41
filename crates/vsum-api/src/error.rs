//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::error;

use vsum_storage::StorageError;
use vsum_summarizer::SummarizerError;
use vsum_supabase::SupabaseError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Detail returned when the database is not configured.
pub const DATABASE_UNAVAILABLE: &str =
    "Database service not available. Please configure Supabase environment variables.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    ServiceUnavailable(String),

    /// S3 credentials or bucket are missing from the environment
    #[error("Missing environment variables: {}", .0.join(", "))]
    StorageNotConfigured(Vec<String>),

    #[error("Rate limited")]
    RateLimited,

    #[error("{0}")]
    Internal(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Database error: {0}")]
    Database(#[from] SupabaseError),

    #[error(transparent)]
    Summarizer(#[from] SummarizerError),
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::ServiceUnavailable(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn database_unavailable() -> Self {
        Self::ServiceUnavailable(DATABASE_UNAVAILABLE.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Summarizer(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Summarizer(SummarizerError::ServiceUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::StorageNotConfigured(_)
            | ApiError::Internal(_)
            | ApiError::Storage(_)
            | ApiError::Database(_)
            | ApiError::Summarizer(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn is_internal(&self) -> bool {
        matches!(
            self,
            ApiError::Internal(_) | ApiError::Storage(_) | ApiError::Database(_) | ApiError::Summarizer(_)
        ) && self.status_code() == StatusCode::INTERNAL_SERVER_ERROR
    }

    fn detail(&self) -> Value {
        match self {
            ApiError::StorageNotConfigured(missing) => json!({
                "error": "AWS configuration incomplete",
                "missing": missing,
                "message": self.to_string(),
            }),
            // Don't expose internal error details in production
            _ if self.is_internal() && is_production() => Value::from("An internal error occurred"),
            _ => Value::from(self.to_string()),
        }
    }
}

fn is_production() -> bool {
    std::env::var("ENVIRONMENT").is_ok_and(|v| v.eq_ignore_ascii_case("production"))
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: Value,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = %status.as_u16(), error = %self, "Request failed");
        }

        (status, Json(ErrorResponse { detail: self.detail() })).into_response()
    }
}

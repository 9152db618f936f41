//! Axum HTTP API server for video summarization.
//!
//! This crate provides:
//! - Streaming summarization routes (YouTube, direct upload, S3)
//! - Presigned S3 uploads, summary history and chat
//! - Rate limiting and security headers
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod streaming;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::ChatService;
pub use state::AppState;

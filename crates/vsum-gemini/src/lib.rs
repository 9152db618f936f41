//! Gemini REST client.
//!
//! Covers the two API surfaces the summarizer needs:
//! - `generateContent`, with plain text or a hosted file as input
//! - The Files API: resumable upload, status polling and deletion

pub mod client;
pub mod config;
pub mod error;
pub mod files;
pub mod types;

pub use client::GeminiClient;
pub use config::{GeminiConfig, DEFAULT_MODEL};
pub use error::{GeminiError, GeminiResult};
pub use types::{FileState, GeminiFile};

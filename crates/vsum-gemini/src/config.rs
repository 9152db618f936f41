//! Gemini client configuration.

use std::time::Duration;

use crate::error::{GeminiError, GeminiResult};

/// Model used for every generation call unless overridden.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-001";

/// Public endpoint of the Generative Language API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini client configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key (sent as the `key` query parameter)
    pub api_key: String,
    /// Model name, e.g. `gemini-2.0-flash-001`
    pub model: String,
    /// API root without trailing slash
    pub base_url: String,
    /// Per-request timeout; generation over video files can be slow
    pub request_timeout: Duration,
    /// Delay between file status checks
    pub poll_interval: Duration,
    /// Wall-clock limit for a file to become ACTIVE
    pub processing_timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(600),
            poll_interval: Duration::from_secs(5),
            processing_timeout: Duration::from_secs(300),
        }
    }

    /// Create config from `GEMINI_API_KEY`, `GEMINI_MODEL` and `GEMINI_BASE_URL`.
    pub fn from_env() -> GeminiResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                GeminiError::config_error(
                    "Gemini API key is not configured. Please add GEMINI_API_KEY to environment variables.",
                )
            })?;

        let mut config = Self::new(api_key);
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            if !model.trim().is_empty() {
                config.model = model;
            }
        }
        if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
            if !base_url.trim().is_empty() {
                config.base_url = base_url.trim_end_matches('/').to_string();
            }
        }
        Ok(config)
    }

    /// Whether an API key is present in the environment.
    pub fn is_configured() -> bool {
        std::env::var("GEMINI_API_KEY").is_ok_and(|k| !k.trim().is_empty())
    }
}

//! Gemini client and content generation.

use reqwest::Client;
use tracing::{debug, info};

use crate::config::GeminiConfig;
use crate::error::{GeminiError, GeminiResult};
use crate::types::{FileData, GenerateContentRequest, GenerateContentResponse, Part};

/// Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    pub(crate) http: Client,
    pub(crate) config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new Gemini client.
    pub fn new(config: GeminiConfig) -> GeminiResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("vsum-gemini/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> GeminiResult<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    /// Model used for generation.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("{}/v1beta/{}", self.config.base_url, path)
    }

    /// Generate text from a prompt.
    pub async fn generate_text(&self, prompt: &str) -> GeminiResult<String> {
        let request = GenerateContentRequest::user(vec![Part::Text {
            text: prompt.to_string(),
        }]);
        self.generate(&request).await
    }

    /// Generate text from an uploaded file followed by a prompt.
    pub async fn generate_with_file(
        &self,
        file_uri: &str,
        mime_type: &str,
        prompt: &str,
    ) -> GeminiResult<String> {
        let request = GenerateContentRequest::user(vec![
            Part::File {
                file_data: FileData {
                    mime_type: mime_type.to_string(),
                    file_uri: file_uri.to_string(),
                },
            },
            Part::Text {
                text: prompt.to_string(),
            },
        ]);
        self.generate(&request).await
    }

    async fn generate(&self, request: &GenerateContentRequest) -> GeminiResult<String> {
        let url = self.api_url(&format!("models/{}:generateContent", self.config.model));
        debug!(model = %self.config.model, "Calling Gemini generateContent");

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GeminiError::api(status.as_u16(), error_text));
        }

        let body: GenerateContentResponse = response.json().await?;
        let text = body.text().ok_or(GeminiError::EmptyResponse)?;

        info!(model = %self.config.model, response_len = text.len(), "Gemini response received");
        Ok(text)
    }
}

//! Language-model seams and their Gemini implementations.

use async_trait::async_trait;

use vsum_gemini::{GeminiClient, GeminiFile};

use crate::error::{SummarizerError, SummarizerResult};

/// Text-in, text-out language model.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Model identifier recorded alongside generated summaries.
    fn model_name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> SummarizerResult<String>;
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn model_name(&self) -> &str {
        self.model()
    }

    async fn generate(&self, prompt: &str) -> SummarizerResult<String> {
        self.generate_text(prompt)
            .await
            .map_err(|e| SummarizerError::ai_failed(e.to_string()))
    }
}

/// Model that can ingest a whole video file hosted on its side.
#[async_trait]
pub trait VideoFileProcessor: Send + Sync {
    fn model_name(&self) -> &str;

    /// Upload the file; the result may still be processing.
    async fn upload(&self, bytes: Vec<u8>, display_name: &str, mime_type: &str) -> SummarizerResult<GeminiFile>;

    /// Block until the uploaded file is ready for generation.
    async fn wait_until_active(&self, name: &str) -> SummarizerResult<()>;

    async fn generate_with_file(&self, file: &GeminiFile, mime_type: &str, prompt: &str) -> SummarizerResult<String>;

    /// Remove the hosted file. Failures are logged, never returned.
    async fn delete(&self, name: &str);
}

#[async_trait]
impl VideoFileProcessor for GeminiClient {
    fn model_name(&self) -> &str {
        self.model()
    }

    async fn upload(&self, bytes: Vec<u8>, display_name: &str, mime_type: &str) -> SummarizerResult<GeminiFile> {
        Ok(self.upload_file(bytes, display_name, mime_type).await?)
    }

    async fn wait_until_active(&self, name: &str) -> SummarizerResult<()> {
        GeminiClient::wait_until_active(self, name).await?;
        Ok(())
    }

    async fn generate_with_file(&self, file: &GeminiFile, mime_type: &str, prompt: &str) -> SummarizerResult<String> {
        GeminiClient::generate_with_file(self, &file.uri, mime_type, prompt)
            .await
            .map_err(|e| SummarizerError::ai_failed(e.to_string()))
    }

    async fn delete(&self, name: &str) {
        self.delete_file(name).await;
    }
}

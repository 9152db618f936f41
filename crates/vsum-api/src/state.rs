//! Application state.

use std::sync::Arc;

use tracing::{info, warn};

use vsum_gemini::GeminiClient;
use vsum_storage::S3Client;
use vsum_summarizer::{
    ObjectSource, PipelineDeps, SummaryStore, TextGenerator, TranscriptSource, VideoFileProcessor,
    YoutubeTranscriptSource,
};
use vsum_supabase::{ConversationRepository, MessageRepository, SummaryRepository, SupabaseClient};

use crate::config::ApiConfig;
use crate::services::ChatService;

/// Shared application state.
///
/// Services whose configuration is missing are `None`; the routes that
/// need them answer with an explanatory error instead.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub pipeline: PipelineDeps,
    pub summaries: Option<Arc<SummaryRepository>>,
    pub storage: Option<Arc<S3Client>>,
    pub chat: Option<ChatService>,
}

impl AppState {
    /// Build state from environment variables, connecting what is configured.
    pub fn from_env(config: ApiConfig) -> Self {
        let gemini = match GeminiClient::from_env() {
            Ok(client) => {
                info!(model = %client.model(), "Gemini client configured");
                Some(Arc::new(client))
            }
            Err(e) => {
                warn!(error = %e, "Gemini not configured; AI routes disabled");
                None
            }
        };

        let supabase = match SupabaseClient::from_env() {
            Ok(client) => Some(client),
            Err(e) => {
                warn!(error = %e, "Supabase not configured; history and chat disabled");
                None
            }
        };

        let storage = match S3Client::from_env() {
            Ok(client) => {
                info!(bucket = %client.bucket(), "S3 client configured");
                Some(Arc::new(client))
            }
            Err(e) => {
                warn!(error = %e, "S3 not configured; presigned uploads disabled");
                None
            }
        };

        let transcripts: Option<Arc<dyn TranscriptSource>> = match YoutubeTranscriptSource::new() {
            Ok(source) => Some(Arc::new(source)),
            Err(e) => {
                warn!(error = %e, "YouTube transcript client unavailable");
                None
            }
        };

        let summaries = supabase
            .as_ref()
            .map(|client| Arc::new(SummaryRepository::new(client.clone())));
        let generator = gemini.clone().map(|g| g as Arc<dyn TextGenerator>);

        let chat = match (&supabase, &summaries) {
            (Some(client), Some(summaries)) => Some(ChatService::new(
                Arc::clone(summaries),
                Arc::new(ConversationRepository::new(client.clone())),
                Arc::new(MessageRepository::new(client.clone())),
                generator.clone(),
            )),
            _ => None,
        };

        let pipeline = PipelineDeps {
            transcripts,
            generator,
            files: gemini.map(|g| g as Arc<dyn VideoFileProcessor>),
            store: summaries.clone().map(|s| s as Arc<dyn SummaryStore>),
            objects: storage.clone().map(|s| s as Arc<dyn ObjectSource>),
        };

        Self {
            config,
            pipeline,
            summaries,
            storage,
            chat,
        }
    }

    /// State with no backing services, wired to the given pipeline collaborators.
    pub fn with_pipeline(config: ApiConfig, pipeline: PipelineDeps) -> Self {
        Self {
            config,
            pipeline,
            summaries: None,
            storage: None,
            chat: None,
        }
    }

    /// Whether a Gemini API key is configured.
    pub fn gemini_configured(&self) -> bool {
        self.pipeline.generator.is_some()
    }
}

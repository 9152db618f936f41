//! YouTube summarization handlers.

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};

use vsum_summarizer::{run_youtube, YoutubeRequest};

use crate::state::AppState;
use crate::streaming::ndjson_response;

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

#[derive(Serialize)]
pub struct SummarizeStatus {
    pub gemini: bool,
}

/// Whether summarization is available.
pub async fn summarize_status(State(state): State<AppState>) -> Json<SummarizeStatus> {
    Json(SummarizeStatus {
        gemini: state.gemini_configured(),
    })
}

/// Summarize a YouTube video, streaming progress as NDJSON.
pub async fn summarize_video(State(state): State<AppState>, Json(request): Json<SummarizeRequest>) -> Response {
    let deps = state.pipeline.clone();
    let request = YoutubeRequest {
        url: request.url.trim().to_string(),
        language: request.language,
    };

    ndjson_response("youtube", move |sink| async move { run_youtube(&deps, &request, &sink).await })
}

//! Summary records and the history view built from them.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::serde_ext::id_string;

/// Title used when nothing better can be derived from the content.
pub const UNTITLED_SUMMARY: &str = "Untitled Summary";

/// Title markers emitted by the summary prompts (English and German).
const TITLE_MARKERS: &[&str] = &["🎯 TITLE:", "🎯 TITEL:", "🎙️ TITLE:", "🎙️ TITEL:"];

/// A persisted summary row (table `summaries`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Summary {
    /// Database-assigned identifier
    #[serde(deserialize_with = "id_string")]
    pub id: String,

    /// Source video identifier (YouTube id, S3 key or upload id)
    #[serde(default)]
    pub video_id: String,

    /// Video title
    #[serde(default)]
    pub title: Option<String>,

    /// Source URL (`https://…`, `s3://…` or `upload://…`)
    #[serde(default)]
    pub video_url: String,

    /// Generated summary text
    #[serde(default)]
    pub summary: String,

    /// Transcript the summary was generated from
    #[serde(default)]
    pub transcript: Option<String>,

    /// Language code of the summary
    #[serde(default = "default_language")]
    pub language: String,

    /// Model that produced the summary
    #[serde(default)]
    pub ai_model: Option<String>,

    /// Video duration in seconds (0 when unknown)
    #[serde(default)]
    pub video_duration: Option<f64>,

    /// Creation timestamp as stored by the database
    #[serde(default)]
    pub created_at: String,

    /// Last update timestamp as stored by the database
    #[serde(default)]
    pub updated_at: Option<String>,
}

fn default_language() -> String {
    "en".to_string()
}

impl Summary {
    /// Where the summarized video came from, inferred from its URL.
    pub fn source(&self) -> SummarySource {
        SummarySource::from_video_url(&self.video_url)
    }

    /// Title to display: the stored title, or one extracted from the summary text.
    pub fn display_title(&self) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => extract_title_from_content(&self.summary),
        }
    }
}

/// Insert payload for a new summary row.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NewSummary {
    pub video_id: String,
    pub title: String,
    pub video_url: String,
    pub summary: String,
    pub transcript: String,
    pub language: String,
    pub ai_model: String,
    pub video_duration: u32,
    pub created_at: DateTime<Utc>,
}

/// Origin of a summarized video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SummarySource {
    /// Public YouTube video (transcript fetched from captions)
    Youtube,
    /// File uploaded by the user (directly or through S3)
    Upload,
}

impl SummarySource {
    /// Infer the source from the stored video URL.
    pub fn from_video_url(url: &str) -> Self {
        if url.starts_with("s3://") || url.starts_with("upload://") {
            SummarySource::Upload
        } else {
            SummarySource::Youtube
        }
    }

    /// Value of the `source` field in history listings.
    pub fn as_str(&self) -> &'static str {
        match self {
            SummarySource::Youtube => "youtube",
            SummarySource::Upload => "upload",
        }
    }

    /// Value of the `mode` field in history listings.
    pub fn mode(&self) -> &'static str {
        match self {
            SummarySource::Youtube => "youtube",
            SummarySource::Upload => "video",
        }
    }
}

impl fmt::Display for SummarySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Summary as returned by the history endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryItem {
    pub id: String,
    pub video_id: String,
    pub title: String,
    /// Summary text (named `content` for frontend compatibility)
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    pub language: String,
    pub mode: String,
    pub source: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<Summary> for SummaryItem {
    fn from(summary: Summary) -> Self {
        let source = summary.source();
        let title = summary.display_title();
        Self {
            id: summary.id,
            video_id: summary.video_id,
            title,
            content: summary.summary,
            transcript: summary.transcript,
            language: summary.language,
            mode: source.mode().to_string(),
            source: source.as_str().to_string(),
            created_at: summary.created_at,
            updated_at: summary.updated_at,
        }
    }
}

/// Extract a title from generated summary text.
///
/// Looks for a `🎯 TITLE:` style marker first (markdown emphasis is
/// ignored), then falls back to the first non-empty line with any leading
/// marker emoji removed.
pub fn extract_title_from_content(content: &str) -> String {
    for line in content.lines() {
        let normalized = line.trim().replace("**", "");
        if TITLE_MARKERS.iter().any(|m| normalized.starts_with(m)) {
            if let Some((_, title)) = normalized.split_once(':') {
                let title = title.trim();
                if !title.is_empty() {
                    return title.to_string();
                }
            }
        }
    }

    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| {
            line.trim_start_matches(['🎯', '🎙', '\u{fe0f}'])
                .trim_start()
                .to_string()
        })
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| UNTITLED_SUMMARY.to_string())
}

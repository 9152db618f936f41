//! YouTube transcript retrieval.

use async_trait::async_trait;
use tracing::{error, info};
use yt_transcript_rs::api::YouTubeTranscriptApi;

use crate::error::{SummarizerError, SummarizerResult};

/// Language preferences tried in order; `None` accepts any language.
pub const LANGUAGE_PREFERENCES: [Option<&str>; 4] = [Some("en"), Some("en-US"), Some("en-GB"), None];

/// Codes offered to the transcript API when any language will do.
const AUTO_DETECT_LANGUAGES: &[&str] = &[
    "en", "de", "es", "fr", "it", "pt", "nl", "pl", "ru", "uk", "tr", "ar", "hi", "ja", "ko",
    "zh-Hans", "zh-Hant", "zh", "id", "vi", "th", "sv", "da", "no", "fi", "cs", "el", "he", "ro",
    "hu",
];

/// Transcripts shorter than this are treated as unusable.
pub const MIN_TRANSCRIPT_CHARS: usize = 50;

/// Title used when none can be derived from the transcript.
pub const DEFAULT_TITLE: &str = "YouTube Video Summary";

/// Source of raw caption snippets for a video.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch caption snippet texts in the given language, or any language when `None`.
    async fn fetch_snippets(&self, video_id: &str, language: Option<&str>) -> SummarizerResult<Vec<String>>;
}

/// [`TranscriptSource`] backed by YouTube's public caption endpoints.
pub struct YoutubeTranscriptSource {
    api: YouTubeTranscriptApi,
}

impl YoutubeTranscriptSource {
    pub fn new() -> SummarizerResult<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| SummarizerError::transcript(e.to_string()))?;
        Ok(Self { api })
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscriptSource {
    async fn fetch_snippets(&self, video_id: &str, language: Option<&str>) -> SummarizerResult<Vec<String>> {
        let languages: Vec<&str> = match language {
            Some(code) => vec![code],
            None => AUTO_DETECT_LANGUAGES.to_vec(),
        };

        let fetched = self
            .api
            .fetch_transcript(video_id, &languages, false)
            .await
            .map_err(|e| SummarizerError::transcript(e.to_string()))?;

        Ok(fetched.snippets.into_iter().map(|s| s.text).collect())
    }
}

/// A usable transcript and the title guessed from it.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptResult {
    pub transcript: String,
    pub title: String,
}

/// Fetch a transcript, trying each language preference in turn.
///
/// Any failure is reported as a user-facing [`SummarizerError::Transcript`]
/// explaining why captions could not be used.
pub async fn fetch_transcript(source: &dyn TranscriptSource, video_id: &str) -> SummarizerResult<TranscriptResult> {
    info!(video_id = %video_id, "Fetching YouTube transcript");

    match try_fetch(source, video_id).await {
        Ok(result) => {
            info!(
                video_id = %video_id,
                title = %result.title,
                transcript_len = result.transcript.len(),
                "Fetched YouTube transcript"
            );
            Ok(result)
        }
        Err(e) => {
            let raw = e.to_string();
            error!(video_id = %video_id, error = %raw, "Failed to get transcript");
            Err(SummarizerError::transcript(format!(
                "Failed to process video: {} Please try a different video with captions/subtitles enabled.",
                classify_error(&raw)
            )))
        }
    }
}

async fn try_fetch(source: &dyn TranscriptSource, video_id: &str) -> SummarizerResult<TranscriptResult> {
    let mut snippets = Vec::new();
    let mut last_error = None;

    for language in LANGUAGE_PREFERENCES {
        let label = language.unwrap_or("auto-detect");
        match source.fetch_snippets(video_id, language).await {
            Ok(found) if !found.is_empty() => {
                info!(language = label, snippets = found.len(), "Transcript found");
                snippets = found;
                break;
            }
            Ok(_) => info!(language = label, "Transcript empty"),
            Err(e) => {
                info!(language = label, error = %e, "Transcript not available");
                last_error = Some(e);
            }
        }
    }

    if snippets.is_empty() {
        return Err(last_error.unwrap_or_else(|| {
            SummarizerError::transcript("No transcript found after trying all language options")
        }));
    }

    let transcript = snippets.join(" ").trim().to_string();
    let len = transcript.chars().count();
    if len < MIN_TRANSCRIPT_CHARS {
        return Err(SummarizerError::transcript(format!(
            "Transcript too short: only {} characters",
            len
        )));
    }

    Ok(TranscriptResult {
        title: extract_title(&snippets),
        transcript,
    })
}

/// Guess a title from the first sentences of the transcript.
pub fn extract_title(snippets: &[String]) -> String {
    let opening = snippets.iter().take(10).map(String::as_str).collect::<Vec<_>>().join(" ");

    opening
        .split(['.', '!', '?'])
        .map(str::trim)
        .find(|sentence| {
            let len = sentence.chars().count();
            len > 20 && len < 100
        })
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

/// Map a raw transcript error to an explanation for the user.
pub fn classify_error(raw: &str) -> &'static str {
    let lower = raw.to_lowercase();
    if lower.contains("could not retrieve a transcript") {
        "No transcripts found for this video. The video may not have captions enabled."
    } else if lower.contains("unavailable") {
        "This video is unavailable or private."
    } else if lower.contains("disabled") {
        "Transcripts are disabled for this video."
    } else if lower.contains("age") {
        "This video is age-restricted and transcripts cannot be fetched."
    } else {
        "This video doesn't have transcripts available."
    }
}

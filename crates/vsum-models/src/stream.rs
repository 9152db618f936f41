//! Progress stream events.
//!
//! Pipelines report to clients as newline-delimited JSON, one event per
//! line: any number of `progress` events followed by exactly one
//! `complete` or `error` event.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Fallback message when an error carries no text.
pub const DEFAULT_ERROR_MESSAGE: &str = "Failed to process video";

/// Discriminant of a [`StreamEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StreamEventType {
    Progress,
    Complete,
    Error,
}

impl StreamEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamEventType::Progress => "progress",
            StreamEventType::Complete => "complete",
            StreamEventType::Error => "error",
        }
    }
}

/// Identifies the input a completed pipeline ran on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum CompletedSource {
    /// YouTube video id, or upload id for direct uploads
    #[serde(rename = "videoId")]
    VideoId(String),
    /// Object key of an S3 upload
    #[serde(rename = "s3Key")]
    S3Key(String),
}

/// A single line of the progress stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Intermediate stage update
    Progress { message: String, progress: u8 },

    /// Pipeline finished and the summary was persisted
    Complete {
        message: String,
        progress: u8,
        summary: String,
        transcript: String,
        #[serde(rename = "summaryId")]
        summary_id: String,
        title: String,
        #[serde(flatten)]
        source: CompletedSource,
    },

    /// Pipeline failed; always reported with progress 0
    Error { message: String, progress: u8 },
}

impl StreamEvent {
    /// Create a progress event, clamping the value to 0-100.
    pub fn progress(message: impl Into<String>, progress: u32) -> Self {
        StreamEvent::Progress {
            message: message.into(),
            progress: progress.min(100) as u8,
        }
    }

    /// Create the terminal success event.
    pub fn complete(
        summary: impl Into<String>,
        transcript: impl Into<String>,
        summary_id: impl Into<String>,
        title: impl Into<String>,
        source: CompletedSource,
    ) -> Self {
        StreamEvent::Complete {
            message: "Video processing completed successfully!".to_string(),
            progress: 100,
            summary: summary.into(),
            transcript: transcript.into(),
            summary_id: summary_id.into(),
            title: title.into(),
            source,
        }
    }

    /// Create the terminal failure event.
    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            DEFAULT_ERROR_MESSAGE.to_string()
        } else {
            message
        };
        StreamEvent::Error {
            message,
            progress: 0,
        }
    }

    pub fn event_type(&self) -> StreamEventType {
        match self {
            StreamEvent::Progress { .. } => StreamEventType::Progress,
            StreamEvent::Complete { .. } => StreamEventType::Complete,
            StreamEvent::Error { .. } => StreamEventType::Error,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            StreamEvent::Progress { message, .. }
            | StreamEvent::Complete { message, .. }
            | StreamEvent::Error { message, .. } => message,
        }
    }

    pub fn progress_value(&self) -> u8 {
        match self {
            StreamEvent::Progress { progress, .. }
            | StreamEvent::Complete { progress, .. }
            | StreamEvent::Error { progress, .. } => *progress,
        }
    }

    /// True for `complete` and `error` events.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StreamEvent::Progress { .. })
    }

    /// Serialize as one NDJSON line, including the trailing newline.
    pub fn to_ndjson_line(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_progress_serialization() {
        let event = StreamEvent::progress("Fetching video transcript...", 20);
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "progress", "message": "Fetching video transcript...", "progress": 20})
        );
    }

    #[test]
    fn test_progress_is_clamped() {
        assert_eq!(StreamEvent::progress("x", 250).progress_value(), 100);
    }

    #[test]
    fn test_complete_with_video_id() {
        let event = StreamEvent::complete(
            "summary",
            "transcript",
            "42",
            "Title",
            CompletedSource::VideoId("dQw4w9WgXcQ".to_string()),
        );
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "complete");
        assert_eq!(value["progress"], 100);
        assert_eq!(value["summaryId"], "42");
        assert_eq!(value["videoId"], "dQw4w9WgXcQ");
        assert!(value.get("s3Key").is_none());
        assert!(event.is_terminal());
    }

    #[test]
    fn test_complete_with_s3_key() {
        let event = StreamEvent::complete(
            "s",
            "t",
            "1",
            "clip.mp4",
            CompletedSource::S3Key("videos/1_clip.mp4".to_string()),
        );
        let line = event.to_ndjson_line().unwrap();
        assert!(line.ends_with('\n'));
        assert!(line.contains("\"s3Key\":\"videos/1_clip.mp4\""));
        assert!(!line.contains("videoId"));
    }

    #[test]
    fn test_error_event() {
        let event = StreamEvent::error("");
        assert_eq!(event.message(), DEFAULT_ERROR_MESSAGE);
        assert_eq!(event.progress_value(), 0);
        assert_eq!(event.event_type(), StreamEventType::Error);
        assert_eq!(event.event_type().as_str(), "error");
    }
}

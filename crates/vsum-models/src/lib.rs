//! Shared data models for the video summarizer backend.
//!
//! This crate provides Serde-serializable types for:
//! - Persisted summaries and their history view
//! - Chat conversations and messages
//! - Progress stream events (newline-delimited JSON)
//! - YouTube URL parsing

pub mod chat;
pub mod language;
pub mod serde_ext;
pub mod stream;
pub mod summary;
pub mod utils;

// Re-export common types
pub use chat::{ChatMessage, Conversation, ConversationRecord, MessageRole, NewConversation, NewMessage};
pub use language::SummaryLanguage;
pub use stream::{CompletedSource, StreamEvent, StreamEventType, DEFAULT_ERROR_MESSAGE};
pub use summary::{extract_title_from_content, NewSummary, Summary, SummaryItem, SummarySource, UNTITLED_SUMMARY};
pub use utils::{extract_youtube_id, YoutubeIdError, YoutubeIdResult};

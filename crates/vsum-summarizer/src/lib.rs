//! Video summarization pipelines.
//!
//! This crate turns a video source into a persisted summary:
//! - YouTube captions via [`transcript`]
//! - Word-window chunking and prompting via [`chunker`] and [`prompts`]
//! - Whole-file analysis on Gemini Files via [`video_file`]
//! - Progress reporting through the [`ProgressSink`] seam
//!
//! External services sit behind traits ([`TranscriptSource`],
//! [`TextGenerator`], [`VideoFileProcessor`], [`SummaryStore`],
//! [`ObjectSource`]) so pipelines run without network in tests.

pub mod chunker;
pub mod cleaner;
pub mod error;
pub mod generator;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod store;
pub mod summarize;
pub mod transcript;
pub mod video_file;

pub use chunker::{split_into_chunks, DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP};
pub use cleaner::{clean_model_output, strip_preamble};
pub use error::{SummarizerError, SummarizerResult, SAVE_FAILED_MESSAGE};
pub use generator::{TextGenerator, VideoFileProcessor};
pub use pipeline::{run_s3, run_upload, run_youtube, PipelineDeps, S3Request, UploadRequest, YoutubeRequest};
pub use progress::{progress_channel, ChannelProgressSink, ProgressSink, DEFAULT_CHANNEL_CAPACITY};
pub use store::{ObjectSource, SummaryStore};
pub use transcript::{fetch_transcript, TranscriptResult, TranscriptSource, YoutubeTranscriptSource};
pub use video_file::{analyze_video_file, placeholder_transcript, VideoAnalysis};

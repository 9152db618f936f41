//! End-to-end summarization pipelines.
//!
//! Each pipeline reports intermediate `progress` events to a
//! [`ProgressSink`] and finishes with exactly one terminal event:
//! `complete` on success or `error` (progress 0) on any failure.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use vsum_models::{extract_youtube_id, CompletedSource, NewSummary, StreamEvent, StreamEventType};

use crate::error::{SummarizerError, SummarizerResult};
use crate::generator::{TextGenerator, VideoFileProcessor};
use crate::progress::ProgressSink;
use crate::prompts::{summary_prompt, video_file_prompt};
use crate::store::{ObjectSource, SummaryStore};
use crate::summarize::{summarize_transcript, ChunkProgress};
use crate::transcript::{fetch_transcript, TranscriptSource};
use crate::video_file::{analyze_video_file, placeholder_transcript};

const GEMINI_NOT_CONFIGURED: &str =
    "Gemini API key is not configured. Please add your API key in the environment variables.";
const DATABASE_NOT_CONFIGURED: &str =
    "Database service not available. Please configure Supabase environment variables.";

/// Collaborators shared by all pipelines. Unconfigured services are `None`
/// and fail the pipeline at the stage that needs them.
#[derive(Clone, Default)]
pub struct PipelineDeps {
    pub transcripts: Option<Arc<dyn TranscriptSource>>,
    pub generator: Option<Arc<dyn TextGenerator>>,
    pub files: Option<Arc<dyn VideoFileProcessor>>,
    pub store: Option<Arc<dyn SummaryStore>>,
    pub objects: Option<Arc<dyn ObjectSource>>,
}

impl PipelineDeps {
    fn generator(&self) -> SummarizerResult<&dyn TextGenerator> {
        self.generator
            .as_deref()
            .ok_or_else(|| SummarizerError::service_unavailable(GEMINI_NOT_CONFIGURED))
    }

    fn files(&self) -> SummarizerResult<&dyn VideoFileProcessor> {
        self.files
            .as_deref()
            .ok_or_else(|| SummarizerError::service_unavailable(GEMINI_NOT_CONFIGURED))
    }

    fn transcripts(&self) -> SummarizerResult<&dyn TranscriptSource> {
        self.transcripts.as_deref().ok_or_else(|| {
            SummarizerError::service_unavailable("YouTube transcript functionality not available")
        })
    }

    fn objects(&self) -> SummarizerResult<&dyn ObjectSource> {
        self.objects
            .as_deref()
            .ok_or_else(|| SummarizerError::service_unavailable("S3 storage is not configured"))
    }

    async fn save(&self, summary: &NewSummary) -> SummarizerResult<String> {
        match self.store.as_deref() {
            Some(store) => store.save(summary).await,
            None => {
                error!(video_id = %summary.video_id, "Database error: {}", DATABASE_NOT_CONFIGURED);
                Err(SummarizerError::persistence(DATABASE_NOT_CONFIGURED))
            }
        }
    }
}

/// Summarize a YouTube video from its captions.
#[derive(Debug, Clone)]
pub struct YoutubeRequest {
    pub url: String,
    pub language: String,
}

/// Summarize a file posted directly to the API.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_name: Option<String>,
    pub size_bytes: Option<u64>,
}

/// Summarize a file previously uploaded to S3.
#[derive(Debug, Clone)]
pub struct S3Request {
    pub s3_key: String,
    pub file_name: String,
}

/// Run the YouTube pipeline and return the type of its terminal event.
pub async fn run_youtube(deps: &PipelineDeps, request: &YoutubeRequest, sink: &dyn ProgressSink) -> StreamEventType {
    finish(sink, youtube_pipeline(deps, request, sink).await).await
}

/// Run the direct-upload pipeline and return the type of its terminal event.
pub async fn run_upload(deps: &PipelineDeps, request: &UploadRequest, sink: &dyn ProgressSink) -> StreamEventType {
    finish(sink, upload_pipeline(deps, request, sink).await).await
}

/// Run the S3 pipeline and return the type of its terminal event.
pub async fn run_s3(deps: &PipelineDeps, request: &S3Request, sink: &dyn ProgressSink) -> StreamEventType {
    finish(sink, s3_pipeline(deps, request, sink).await).await
}

async fn finish(sink: &dyn ProgressSink, result: SummarizerResult<StreamEvent>) -> StreamEventType {
    let event = match result {
        Ok(event) => event,
        Err(e) => {
            error!(error = %e, "Video processing failed");
            StreamEvent::error(e.to_string())
        }
    };
    let event_type = event.event_type();
    sink.emit(event).await;
    event_type
}

async fn youtube_pipeline(
    deps: &PipelineDeps,
    request: &YoutubeRequest,
    sink: &dyn ProgressSink,
) -> SummarizerResult<StreamEvent> {
    let video_id = extract_youtube_id(&request.url).map_err(|e| SummarizerError::invalid_input(e.to_string()))?;
    info!(video_id = %video_id, language = %request.language, "Processing video request");

    sink.progress("Starting video processing...", 5).await;
    sink.progress("Fetching video transcript...", 20).await;

    let fetched = fetch_transcript(deps.transcripts()?, &video_id).await?;

    sink.progress("Transcript fetched successfully, analyzing content...", 50)
        .await;
    sink.progress("Generating summary with detailed visual information...", 60)
        .await;

    let generator = deps.generator()?;
    let language = request.language.as_str();
    let summary = summarize_transcript(
        generator,
        sink,
        &fetched.transcript,
        |text| summary_prompt(text, language),
        ChunkProgress { base: 60, span: 15 },
    )
    .await?;

    sink.progress("Saving summary to database...", 85).await;

    let summary_id = deps
        .save(&NewSummary {
            video_id: video_id.clone(),
            title: fetched.title.clone(),
            video_url: request.url.clone(),
            summary: summary.clone(),
            transcript: fetched.transcript.clone(),
            language: request.language.clone(),
            ai_model: generator.model_name().to_string(),
            video_duration: 0,
            created_at: Utc::now(),
        })
        .await?;

    info!(video_id = %video_id, summary_id = %summary_id, "YouTube summary saved");

    Ok(StreamEvent::complete(
        summary,
        fetched.transcript,
        summary_id,
        fetched.title,
        CompletedSource::VideoId(video_id),
    ))
}

async fn upload_pipeline(
    deps: &PipelineDeps,
    request: &UploadRequest,
    sink: &dyn ProgressSink,
) -> SummarizerResult<StreamEvent> {
    let file_name = request.file_name.as_deref().filter(|n| !n.is_empty());
    info!(file_name = ?file_name, size = ?request.size_bytes, "Processing uploaded video");

    sink.progress("Processing video file...", 10).await;
    sink.progress("Extracting audio from video...", 30).await;

    let transcript = placeholder_transcript(file_name, request.size_bytes);

    sink.progress("Transcription completed, generating summary...", 60)
        .await;

    let generator = deps.generator()?;
    let prompt_name = file_name.unwrap_or("uploaded_video");
    let summary = summarize_transcript(
        generator,
        sink,
        &transcript,
        |text| video_file_prompt(text, prompt_name),
        ChunkProgress { base: 60, span: 20 },
    )
    .await?;

    sink.progress("Saving summary to database...", 90).await;

    let video_id = format!("upload_{}_{}", Utc::now().timestamp_millis(), prompt_name);
    let title = file_name.unwrap_or("Uploaded Video").to_string();

    let summary_id = deps
        .save(&NewSummary {
            video_id: video_id.clone(),
            title: title.clone(),
            video_url: format!("upload://{}", prompt_name),
            summary: summary.clone(),
            transcript: transcript.clone(),
            language: "en".to_string(),
            ai_model: generator.model_name().to_string(),
            video_duration: 0,
            created_at: Utc::now(),
        })
        .await?;

    info!(video_id = %video_id, summary_id = %summary_id, "Upload summary saved");

    Ok(StreamEvent::complete(
        summary,
        transcript,
        summary_id,
        title,
        CompletedSource::VideoId(video_id),
    ))
}

async fn s3_pipeline(deps: &PipelineDeps, request: &S3Request, sink: &dyn ProgressSink) -> SummarizerResult<StreamEvent> {
    info!(s3_key = %request.s3_key, file_name = %request.file_name, "Processing S3 video");

    sink.progress("Downloading video from S3...", 10).await;
    let files = deps.files()?;
    let object = deps.objects()?.download(&request.s3_key).await?;

    let analysis = analyze_video_file(
        files,
        sink,
        object.bytes,
        &request.file_name,
        &object.content_type,
    )
    .await?;

    sink.progress("Saving to database...", 90).await;

    let summary_id = deps
        .save(&NewSummary {
            video_id: request.s3_key.clone(),
            title: request.file_name.clone(),
            video_url: format!("s3://{}", request.s3_key),
            summary: analysis.summary.clone(),
            transcript: analysis.transcript.clone(),
            language: "en".to_string(),
            ai_model: files.model_name().to_string(),
            video_duration: 0,
            created_at: Utc::now(),
        })
        .await?;

    info!(s3_key = %request.s3_key, summary_id = %summary_id, "S3 summary saved");

    Ok(StreamEvent::complete(
        analysis.summary,
        analysis.transcript,
        summary_id,
        request.file_name.clone(),
        CompletedSource::S3Key(request.s3_key.clone()),
    ))
}

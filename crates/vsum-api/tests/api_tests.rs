//! API integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use serial_test::serial;
use tower::ServiceExt;

use vsum_api::{create_router, ApiConfig, AppState};
use vsum_models::NewSummary;
use vsum_summarizer::{PipelineDeps, SummarizerResult, SummaryStore, TextGenerator, TranscriptSource};

// =============================================================================
// Test Helpers
// =============================================================================

struct FixedTranscripts;

#[async_trait]
impl TranscriptSource for FixedTranscripts {
    async fn fetch_snippets(&self, _video_id: &str, _language: Option<&str>) -> SummarizerResult<Vec<String>> {
        Ok(vec![
            "Welcome to this talk about ownership in Rust.".to_string(),
            "Today we look at borrowing and lifetimes in detail.".to_string(),
        ])
    }
}

struct FixedGenerator;

#[async_trait]
impl TextGenerator for FixedGenerator {
    fn model_name(&self) -> &str {
        "test-model"
    }

    async fn generate(&self, _prompt: &str) -> SummarizerResult<String> {
        Ok("🎯 TITLE: Ownership\n\n• Borrowing rules".to_string())
    }
}

struct FixedStore;

#[async_trait]
impl SummaryStore for FixedStore {
    async fn save(&self, _summary: &NewSummary) -> SummarizerResult<String> {
        Ok("42".to_string())
    }
}

fn test_config() -> ApiConfig {
    ApiConfig {
        rate_limit_rps: 100,
        ..ApiConfig::default()
    }
}

fn unconfigured_router() -> Router {
    create_router(AppState::with_pipeline(test_config(), PipelineDeps::default()), None)
}

fn mocked_router() -> Router {
    let pipeline = PipelineDeps {
        transcripts: Some(Arc::new(FixedTranscripts)),
        generator: Some(Arc::new(FixedGenerator)),
        store: Some(Arc::new(FixedStore)),
        ..PipelineDeps::default()
    };
    create_router(AppState::with_pipeline(test_config(), pipeline), None)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn ndjson_events(response: Response<Body>) -> Vec<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec())
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let response = unconfigured_router().oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_root_banner() {
    let response = unconfigured_router().oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["message"].is_string());
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_ready_reports_degraded_without_services() {
    let response = unconfigured_router().oneshot(get("/ready")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["database"]["status"], "error");
}

#[tokio::test]
async fn test_security_and_request_id_headers() {
    let response = unconfigured_router()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("X-Request-ID", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-request-id"], "req-123");
}

// =============================================================================
// Summarize
// =============================================================================

#[tokio::test]
async fn test_summarize_status_without_gemini() {
    let response = unconfigured_router().oneshot(get("/api/summarize")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"gemini": false}));
}

#[tokio::test]
async fn test_summarize_streams_progress_and_completion() {
    let response = mocked_router()
        .oneshot(post_json(
            "/api/summarize",
            json!({"url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/x-ndjson");
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");

    let events = ndjson_events(response).await;
    let progress: Vec<u64> = events.iter().map(|e| e["progress"].as_u64().unwrap()).collect();
    assert_eq!(progress, vec![5, 20, 50, 60, 85, 100]);

    let last = events.last().unwrap();
    assert_eq!(last["type"], "complete");
    assert_eq!(last["summaryId"], "42");
    assert_eq!(last["videoId"], "dQw4w9WgXcQ");
}

#[tokio::test]
async fn test_summarize_invalid_url_streams_single_error() {
    let response = mocked_router()
        .oneshot(post_json("/api/summarize", json!({"url": "https://example.com/video"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let events = ndjson_events(response).await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["type"], "error");
    assert_eq!(events[0]["progress"], 0);
}

#[tokio::test]
async fn test_summarize_without_services_reports_error_event() {
    let response = unconfigured_router()
        .oneshot(post_json(
            "/api/summarize",
            json!({"url": "https://youtu.be/dQw4w9WgXcQ", "language": "de"}),
        ))
        .await
        .unwrap();

    let events = ndjson_events(response).await;
    let last = events.last().unwrap();
    assert_eq!(last["type"], "error");
    assert_eq!(last["message"], "YouTube transcript functionality not available");
}

// =============================================================================
// Video uploads
// =============================================================================

fn multipart_request(field: &str, file_name: &str, content: &[u8]) -> Request<Body> {
    let boundary = "vsum-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: video/mp4\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/process-video")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_process_video_streams_upload_pipeline() {
    let response = mocked_router()
        .oneshot(multipart_request("video", "talk.mp4", &[0u8; 2048]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let events = ndjson_events(response).await;
    let progress: Vec<u64> = events.iter().map(|e| e["progress"].as_u64().unwrap()).collect();
    assert_eq!(progress, vec![10, 30, 60, 90, 100]);

    let last = events.last().unwrap();
    assert_eq!(last["type"], "complete");
    assert_eq!(last["title"], "talk.mp4");
    assert!(last["videoId"].as_str().unwrap().starts_with("upload_"));
}

#[tokio::test]
async fn test_process_video_measures_full_upload_size() {
    let content = vec![7u8; 3 * 1024 * 1024];
    let response = mocked_router()
        .oneshot(multipart_request("video", "lecture.mp4", &content))
        .await
        .unwrap();

    let events = ndjson_events(response).await;
    let last = events.last().unwrap();
    assert_eq!(last["type"], "complete");
    assert!(
        last["transcript"].as_str().unwrap().contains("approximately 3MB"),
        "{}",
        last["transcript"]
    );
}

#[tokio::test]
async fn test_process_video_requires_video_field() {
    let response = mocked_router()
        .oneshot(multipart_request("attachment", "talk.mp4", b"data"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["detail"], "No video file provided");
}

#[tokio::test]
async fn test_process_s3_video_requires_fields() {
    let response = mocked_router()
        .oneshot(post_json("/api/process-s3-video", json!({"s3Key": "videos/1_a.mp4"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["detail"], "Missing required fields: s3Key, fileName");
}

#[tokio::test]
async fn test_presigned_upload_rejects_non_video() {
    let response = unconfigured_router()
        .oneshot(post_json(
            "/api/upload/presigned",
            json!({"fileName": "cat.png", "fileType": "image/png", "fileSize": 1024}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["detail"], "Only video files are allowed");
}

#[tokio::test]
#[serial]
async fn test_presigned_upload_lists_missing_configuration() {
    for name in ["AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY", "AWS_REGION", "AWS_S3_BUCKET"] {
        std::env::remove_var(name);
    }

    let response = unconfigured_router()
        .oneshot(post_json(
            "/api/upload/presigned",
            json!({"fileName": "talk.mp4", "fileType": "video/mp4", "fileSize": 1024}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body_json(response).await["detail"].clone();
    assert_eq!(detail["error"], "AWS configuration incomplete");
    assert_eq!(
        detail["missing"],
        json!(["AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY", "AWS_REGION", "AWS_S3_BUCKET"])
    );
}

// =============================================================================
// History and chat
// =============================================================================

#[tokio::test]
async fn test_history_without_database() {
    let response = unconfigured_router().oneshot(get("/api/history")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body_json(response).await["detail"],
        "Database service not available. Please configure Supabase environment variables."
    );
}

#[tokio::test]
async fn test_chat_without_database() {
    let response = unconfigured_router()
        .oneshot(post_json(
            "/api/chat/message",
            json!({"conversation_id": "1", "message": "What is it about?"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// =============================================================================
// Rate limiting
// =============================================================================

#[tokio::test]
async fn test_rate_limiting_per_client() {
    let config = ApiConfig {
        rate_limit_rps: 1,
        ..ApiConfig::default()
    };
    let app = create_router(AppState::with_pipeline(config, PipelineDeps::default()), None);

    let request = || {
        Request::builder()
            .uri("/api/summarize")
            .header("X-Forwarded-For", "192.168.1.100")
            .body(Body::empty())
            .unwrap()
    };

    let first = app.clone().oneshot(request()).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.clone().oneshot(request()).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);

    // Health routes are not rate limited
    let health = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(health.status(), StatusCode::OK);
}

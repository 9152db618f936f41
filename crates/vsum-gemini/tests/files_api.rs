//! Gemini client tests against a mock Generative Language server.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vsum_gemini::{FileState, GeminiClient, GeminiConfig, GeminiError};

fn test_client(server: &MockServer) -> GeminiClient {
    let mut config = GeminiConfig::new("test-key");
    config.base_url = server.uri();
    config.poll_interval = Duration::from_millis(10);
    config.processing_timeout = Duration::from_millis(200);
    GeminiClient::new(config).unwrap()
}

fn file_json(state: &str) -> serde_json::Value {
    json!({
        "name": "files/abc123",
        "uri": "https://generativelanguage.googleapis.com/v1beta/files/abc123",
        "mimeType": "video/mp4",
        "sizeBytes": "4",
        "state": state
    })
}

#[tokio::test]
async fn test_generate_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash-001:generateContent"))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({"contents": [{"parts": [{"text": "Summarize this"}]}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "🎯 TITLE: Done"}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = test_client(&server).generate_text("Summarize this").await.unwrap();
    assert_eq!(text, "🎯 TITLE: Done");
}

#[tokio::test]
async fn test_generate_with_file_sends_file_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash-001:generateContent"))
        .and(body_partial_json(json!({"contents": [{"parts": [
            {"fileData": {"mimeType": "video/mp4", "fileUri": "uri-1"}},
            {"text": "Transcribe"}
        ]}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "[00:00] hi"}]}}]
        })))
        .mount(&server)
        .await;

    let text = test_client(&server)
        .generate_with_file("uri-1", "video/mp4", "Transcribe")
        .await
        .unwrap();
    assert_eq!(text, "[00:00] hi");
}

#[tokio::test]
async fn test_generate_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    assert!(matches!(
        client.generate_text("x").await,
        Err(GeminiError::EmptyResponse)
    ));
    assert!(matches!(
        client.generate_text("x").await,
        Err(GeminiError::Api { status: 403, .. })
    ));
}

#[tokio::test]
async fn test_resumable_upload() {
    let server = MockServer::start().await;
    let upload_url = format!("{}/upload-session/xyz", server.uri());

    Mock::given(method("POST"))
        .and(path("/upload/v1beta/files"))
        .and(header("x-goog-upload-protocol", "resumable"))
        .and(header("x-goog-upload-command", "start"))
        .and(header("x-goog-upload-header-content-length", "4"))
        .and(header("x-goog-upload-header-content-type", "video/mp4"))
        .and(body_partial_json(json!({"file": {"display_name": "clip.mp4"}})))
        .respond_with(ResponseTemplate::new(200).insert_header("x-goog-upload-url", upload_url.as_str()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/upload-session/xyz"))
        .and(header("x-goog-upload-offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"file": file_json("PROCESSING")})))
        .expect(1)
        .mount(&server)
        .await;

    let file = test_client(&server)
        .upload_file(b"data".to_vec(), "clip.mp4", "video/mp4")
        .await
        .unwrap();
    assert_eq!(file.name, "files/abc123");
    assert_eq!(file.state, FileState::Processing);
}

#[tokio::test]
async fn test_upload_without_session_url_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/v1beta/files"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .upload_file(b"data".to_vec(), "clip.mp4", "video/mp4")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "No upload URL received from Google Files API");
}

#[tokio::test]
async fn test_wait_until_active_polls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/files/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_json("PROCESSING")))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1beta/files/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_json("ACTIVE")))
        .mount(&server)
        .await;

    let file = test_client(&server).wait_until_active("files/abc123").await.unwrap();
    assert_eq!(file.state, FileState::Active);
}

#[tokio::test]
async fn test_wait_until_active_failed_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/files/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_json("FAILED")))
        .mount(&server)
        .await;

    let err = test_client(&server).wait_until_active("files/abc123").await.unwrap_err();
    assert_eq!(err.to_string(), "File processing failed on Google servers");
}

#[tokio::test]
async fn test_wait_until_active_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/files/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_json("PROCESSING")))
        .mount(&server)
        .await;

    let mut config = GeminiConfig::new("test-key");
    config.base_url = server.uri();
    config.poll_interval = Duration::from_millis(20);
    config.processing_timeout = Duration::from_secs(0);
    let client = GeminiClient::new(config).unwrap();

    let err = client.wait_until_active("files/abc123").await.unwrap_err();
    assert!(matches!(err, GeminiError::ProcessingTimeout(0)));
}

#[tokio::test]
async fn test_delete_file_swallows_errors() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1beta/files/abc123"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server).delete_file("files/abc123").await;
}

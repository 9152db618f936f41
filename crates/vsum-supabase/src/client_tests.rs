//! Tests for the Supabase client against a mock PostgREST server.

use std::time::Duration;

use serde_json::json;
use serial_test::serial;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vsum_models::{MessageRole, NewConversation, NewMessage, NewSummary};

use crate::client::{SupabaseClient, SupabaseConfig};
use crate::error::SupabaseError;
use crate::repos::{ConversationRepository, MessageRepository, SummaryRepository};
use crate::retry::RetryConfig;

// =============================================================================
// Test Helpers
// =============================================================================

fn test_client(server: &MockServer) -> SupabaseClient {
    SupabaseClient::new(SupabaseConfig {
        url: server.uri(),
        api_key: "test-key".to_string(),
        timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
        retry: RetryConfig {
            max_retries: 2,
            base_delay_ms: 1,
            max_delay_ms: 5,
        },
    })
    .unwrap()
}

fn summary_row(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "video_id": "dQw4w9WgXcQ",
        "title": "A talk",
        "video_url": "https://youtu.be/dQw4w9WgXcQ",
        "summary": "🎯 TITLE: A talk",
        "transcript": "hello world",
        "language": "en",
        "ai_model": "gemini-2.0-flash-001",
        "video_duration": 0,
        "created_at": "2024-05-01T10:00:00+00:00"
    })
}

// =============================================================================
// Error Mapping
// =============================================================================

#[test]
fn test_error_from_http_status() {
    assert!(matches!(
        SupabaseError::from_http_status(401, "x"),
        SupabaseError::Unauthorized(_)
    ));
    assert!(matches!(
        SupabaseError::from_http_status(404, "x"),
        SupabaseError::NotFound(_)
    ));
    assert!(matches!(
        SupabaseError::from_http_status(409, "x"),
        SupabaseError::Conflict(_)
    ));

    let rate_limited = SupabaseError::from_http_status(429, "x");
    assert!(rate_limited.is_retryable());
    assert_eq!(rate_limited.http_status(), Some(429));
    assert_eq!(rate_limited.retry_after_ms(), None);

    let server = SupabaseError::from_http_status(503, "x");
    assert!(server.is_retryable());
    assert_eq!(server.http_status(), Some(503));

    assert!(!SupabaseError::from_http_status(400, "x").is_retryable());
    assert_eq!(SupabaseError::RateLimited(2000).retry_after_ms(), Some(2000));
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
#[serial]
fn test_config_from_env_fallback_names() {
    std::env::remove_var("SUPABASE_URL");
    std::env::remove_var("SUPABASE_KEY");
    std::env::set_var("NEXT_PUBLIC_SUPABASE_URL", "https://proj.supabase.co");
    std::env::set_var("NEXT_PUBLIC_SUPABASE_ANON_KEY", "anon");

    let config = SupabaseConfig::from_env().unwrap();
    assert_eq!(config.url, "https://proj.supabase.co");
    assert_eq!(config.api_key, "anon");

    std::env::remove_var("NEXT_PUBLIC_SUPABASE_URL");
    std::env::remove_var("NEXT_PUBLIC_SUPABASE_ANON_KEY");
}

#[test]
#[serial]
fn test_config_from_env_missing() {
    for name in [
        "SUPABASE_URL",
        "SUPABASE_KEY",
        "NEXT_PUBLIC_SUPABASE_URL",
        "NEXT_PUBLIC_SUPABASE_ANON_KEY",
    ] {
        std::env::remove_var(name);
    }
    assert!(matches!(
        SupabaseConfig::from_env(),
        Err(SupabaseError::ConfigError(_))
    ));
}

// =============================================================================
// Requests
// =============================================================================

#[tokio::test]
async fn test_list_summaries_sends_auth_and_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/summaries"))
        .and(header("apikey", "test-key"))
        .and(header("authorization", "Bearer test-key"))
        .and(query_param("order", "created_at.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([summary_row(2), summary_row(1)])))
        .expect(1)
        .mount(&server)
        .await;

    let repo = SummaryRepository::new(test_client(&server));
    let rows = repo.list().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, "2");
}

#[tokio::test]
async fn test_get_summary_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/summaries"))
        .and(query_param("id", "eq.99"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let repo = SummaryRepository::new(test_client(&server));
    assert!(repo.get("99").await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_summary_returns_representation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/summaries"))
        .and(header("prefer", "return=representation"))
        .and(body_partial_json(json!({"video_id": "dQw4w9WgXcQ", "language": "en"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([summary_row(7)])))
        .expect(1)
        .mount(&server)
        .await;

    let repo = SummaryRepository::new(test_client(&server));
    let stored = repo
        .create(&NewSummary {
            video_id: "dQw4w9WgXcQ".to_string(),
            title: "A talk".to_string(),
            video_url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
            summary: "🎯 TITLE: A talk".to_string(),
            transcript: "hello world".to_string(),
            language: "en".to_string(),
            ai_model: "gemini-2.0-flash-001".to_string(),
            video_duration: 0,
            created_at: chrono::Utc::now(),
        })
        .await
        .unwrap();
    assert_eq!(stored.id, "7");
}

#[tokio::test]
async fn test_insert_without_rows_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/chat_conversations"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .mount(&server)
        .await;

    let repo = ConversationRepository::new(test_client(&server));
    let result = repo
        .create(&NewConversation {
            summary_id: "1".to_string(),
            title: "Chat".to_string(),
        })
        .await;
    assert!(matches!(result, Err(SupabaseError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_delete_reports_whether_row_matched() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/chat_conversations"))
        .and(query_param("id", "eq.5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 5}])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/chat_conversations"))
        .and(query_param("id", "eq.6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let repo = ConversationRepository::new(test_client(&server));
    assert!(repo.delete("5").await.unwrap());
    assert!(!repo.delete("6").await.unwrap());
}

#[tokio::test]
async fn test_messages_listed_oldest_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/chat_messages"))
        .and(query_param("conversation_id", "eq.3"))
        .and(query_param("order", "created_at.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "conversation_id": 3, "role": "user", "content": "Hi", "created_at": "t1"},
            {"id": 2, "conversation_id": 3, "role": "assistant", "content": "Hello", "created_at": "t2"}
        ])))
        .mount(&server)
        .await;

    let repo = MessageRepository::new(test_client(&server));
    let messages = repo.list_for_conversation("3").await.unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role, MessageRole::Assistant);
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/chat_messages"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/chat_messages"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            {"role": "user", "content": "Hi", "created_at": "t1"}
        ])))
        .mount(&server)
        .await;

    let repo = MessageRepository::new(test_client(&server));
    let message = repo.create(&NewMessage::user("3", "Hi")).await.unwrap();
    assert_eq!(message.content, "Hi");
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/summaries"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad filter"))
        .expect(1)
        .mount(&server)
        .await;

    let repo = SummaryRepository::new(test_client(&server));
    let err = repo.list().await.unwrap_err();
    assert!(matches!(err, SupabaseError::RequestFailed(ref msg) if msg.contains("bad filter")));
}

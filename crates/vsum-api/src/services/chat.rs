//! Question answering over a stored summary.

use std::sync::Arc;

use futures_util::future::try_join_all;
use tracing::{info, warn};

use vsum_models::{ChatMessage, Conversation, ConversationRecord, MessageRole, NewConversation, NewMessage};
use vsum_summarizer::prompts::chat_prompt;
use vsum_summarizer::{SummarizerError, TextGenerator};
use vsum_supabase::{ConversationRepository, MessageRepository, SummaryRepository};

use crate::error::{ApiError, ApiResult};
use crate::metrics;

/// Conversations and messages about a summary, answered by the language model.
#[derive(Clone)]
pub struct ChatService {
    summaries: Arc<SummaryRepository>,
    conversations: Arc<ConversationRepository>,
    messages: Arc<MessageRepository>,
    generator: Option<Arc<dyn TextGenerator>>,
}

impl ChatService {
    pub fn new(
        summaries: Arc<SummaryRepository>,
        conversations: Arc<ConversationRepository>,
        messages: Arc<MessageRepository>,
        generator: Option<Arc<dyn TextGenerator>>,
    ) -> Self {
        Self {
            summaries,
            conversations,
            messages,
            generator,
        }
    }

    /// Start a conversation about an existing summary.
    pub async fn create_conversation(&self, request: &NewConversation) -> ApiResult<Conversation> {
        if self.summaries.get(&request.summary_id).await?.is_none() {
            return Err(ApiError::not_found("Summary not found"));
        }

        let record = self.conversations.create(request).await?;
        Ok(Conversation::from_record(record, Vec::new()))
    }

    /// Conversations of a summary with their messages, newest conversation first.
    pub async fn list_conversations(&self, summary_id: &str) -> ApiResult<Vec<Conversation>> {
        let records = self.conversations.list_for_summary(summary_id).await?;
        try_join_all(records.into_iter().map(|record| self.with_messages(record))).await
    }

    pub async fn get_conversation(&self, conversation_id: &str) -> ApiResult<Conversation> {
        let record = self
            .conversations
            .get(conversation_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Conversation not found"))?;
        self.with_messages(record).await
    }

    /// Record the user's question, answer it and record the answer.
    ///
    /// The prompt replays the messages that preceded the question.
    pub async fn send_message(&self, conversation_id: &str, question: &str) -> ApiResult<ChatMessage> {
        if question.trim().is_empty() {
            return Err(ApiError::bad_request("Message cannot be empty"));
        }

        let conversation = self.get_conversation(conversation_id).await?;
        let summary = self
            .summaries
            .get(&conversation.summary_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Summary not found"))?;
        let generator = self
            .generator
            .as_deref()
            .ok_or_else(|| ApiError::internal("Gemini API key not configured"))?;

        self.messages
            .create(&NewMessage::user(conversation_id, question))
            .await?;

        let prompt = chat_prompt(&summary, &conversation.messages, question);
        let answer = generator.generate(&prompt).await.map_err(|e| {
            warn!(conversation_id = %conversation_id, error = %e, "Chat generation failed");
            match e {
                SummarizerError::AiFailed(msg) => ApiError::internal(format!("Failed to generate AI response: {}", msg)),
                other => ApiError::from(other),
            }
        })?;

        let saved = self
            .messages
            .create(&NewMessage::assistant(conversation_id, answer.as_str()))
            .await?;

        metrics::record_chat_message();
        info!(conversation_id = %conversation_id, answer_len = answer.len(), "Answered chat message");

        Ok(ChatMessage {
            role: MessageRole::Assistant,
            content: answer,
            created_at: saved.created_at,
        })
    }

    /// Delete a conversation; its messages go with it.
    pub async fn delete_conversation(&self, conversation_id: &str) -> ApiResult<()> {
        if self.conversations.delete(conversation_id).await? {
            info!(conversation_id = %conversation_id, "Deleted conversation");
            Ok(())
        } else {
            Err(ApiError::not_found("Conversation not found"))
        }
    }

    async fn with_messages(&self, record: ConversationRecord) -> ApiResult<Conversation> {
        let messages = self.messages.list_for_conversation(&record.id).await?;
        Ok(Conversation::from_record(record, messages))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use vsum_summarizer::SummarizerResult;
    use vsum_supabase::{RetryConfig, SupabaseClient, SupabaseConfig};

    use super::*;

    struct EchoGenerator {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        fn model_name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, prompt: &str) -> SummarizerResult<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("It is about ownership.".to_string())
        }
    }

    fn service(server: &MockServer, generator: Option<Arc<dyn TextGenerator>>) -> ChatService {
        let client = SupabaseClient::new(SupabaseConfig {
            url: server.uri(),
            api_key: "test-key".to_string(),
            timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            retry: RetryConfig {
                max_retries: 0,
                base_delay_ms: 1,
                max_delay_ms: 1,
            },
        })
        .unwrap();

        ChatService::new(
            Arc::new(SummaryRepository::new(client.clone())),
            Arc::new(ConversationRepository::new(client.clone())),
            Arc::new(MessageRepository::new(client)),
            generator,
        )
    }

    async fn mount_conversation(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/rest/v1/chat_conversations"))
            .and(query_param("id", "eq.7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": 7, "summary_id": 12, "title": "Questions",
                "created_at": "2024-05-01T10:00:00+00:00",
                "updated_at": "2024-05-01T10:00:00+00:00"
            }])))
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/chat_messages"))
            .and(query_param("conversation_id", "eq.7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"role": "user", "content": "Who is speaking?", "created_at": "2024-05-01T10:01:00+00:00"},
                {"role": "assistant", "content": "A Rust maintainer.", "created_at": "2024-05-01T10:01:05+00:00"}
            ])))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_send_message_replays_history() {
        let server = MockServer::start().await;
        mount_conversation(&server).await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/summaries"))
            .and(query_param("id", "eq.12"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": 12, "video_id": "abc", "title": "Rust talk",
                "video_url": "https://youtu.be/abc", "summary": "Ownership and borrowing",
                "transcript": "today we talk about ownership", "language": "en",
                "created_at": "2024-05-01T09:00:00+00:00"
            }])))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/chat_messages"))
            .and(body_partial_json(json!({"role": "user", "content": "What is it about?"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([
                {"role": "user", "content": "What is it about?", "created_at": "2024-05-01T10:02:00+00:00"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/chat_messages"))
            .and(body_partial_json(json!({"role": "assistant"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([
                {"role": "assistant", "content": "It is about ownership.", "created_at": "2024-05-01T10:02:03+00:00"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let generator = Arc::new(EchoGenerator {
            prompts: Mutex::new(Vec::new()),
        });
        let chat = service(&server, Some(generator.clone()));

        let reply = chat.send_message("7", "What is it about?").await.unwrap();
        assert_eq!(reply.role, MessageRole::Assistant);
        assert_eq!(reply.content, "It is about ownership.");
        assert_eq!(reply.created_at.as_deref(), Some("2024-05-01T10:02:03+00:00"));

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Video Title: Rust talk"));
        assert!(prompts[0].contains("User: Who is speaking?\nAssistant: A Rust maintainer.\nUser: What is it about?"));
    }

    #[tokio::test]
    async fn test_send_message_requires_generator() {
        let server = MockServer::start().await;
        mount_conversation(&server).await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/summaries"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": 12, "summary": "s", "created_at": "2024-05-01T09:00:00+00:00"
            }])))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/chat_messages"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let err = service(&server, None).send_message("7", "Hi").await.unwrap_err();
        assert_eq!(err.to_string(), "Gemini API key not configured");
    }

    #[tokio::test]
    async fn test_create_conversation_for_missing_summary() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/summaries"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let err = service(&server, None)
            .create_conversation(&NewConversation {
                summary_id: "404".to_string(),
                title: "Questions".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(ref msg) if msg == "Summary not found"));
    }

    #[tokio::test]
    async fn test_delete_missing_conversation() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/chat_conversations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let err = service(&server, None).delete_conversation("9").await.unwrap_err();
        assert_eq!(err.to_string(), "Conversation not found");
    }
}

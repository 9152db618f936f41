//! Typed repositories for summaries and chat history.

use tracing::info;

use vsum_models::{
    ChatMessage, ConversationRecord, NewConversation, NewMessage, NewSummary, Summary,
};

use crate::client::SupabaseClient;
use crate::error::{SupabaseError, SupabaseResult};
use crate::query::Query;

/// Table holding generated summaries.
pub const SUMMARIES_TABLE: &str = "summaries";
/// Table holding chat conversations.
pub const CONVERSATIONS_TABLE: &str = "chat_conversations";
/// Table holding chat messages.
pub const MESSAGES_TABLE: &str = "chat_messages";

fn first_row<T>(rows: Vec<T>, table: &str) -> SupabaseResult<T> {
    rows.into_iter().next().ok_or_else(|| {
        SupabaseError::invalid_response(format!("No data returned from {} insert", table))
    })
}

/// Repository for summary rows.
#[derive(Clone)]
pub struct SummaryRepository {
    client: SupabaseClient,
}

impl SummaryRepository {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// Insert a summary and return the stored row.
    pub async fn create(&self, summary: &NewSummary) -> SupabaseResult<Summary> {
        let rows = self.client.insert(SUMMARIES_TABLE, summary).await?;
        let stored: Summary = first_row(rows, SUMMARIES_TABLE)?;
        info!(summary_id = %stored.id, video_id = %stored.video_id, "Created summary");
        Ok(stored)
    }

    /// All summaries, newest first.
    pub async fn list(&self) -> SupabaseResult<Vec<Summary>> {
        let query = Query::new().select("*").order("created_at", true);
        self.client.select(SUMMARIES_TABLE, &query).await
    }

    pub async fn get(&self, id: &str) -> SupabaseResult<Option<Summary>> {
        let query = Query::new().select("*").eq("id", id).limit(1);
        let rows: Vec<Summary> = self.client.select(SUMMARIES_TABLE, &query).await?;
        Ok(rows.into_iter().next())
    }

    /// Delete a summary. Returns false when no row matched.
    pub async fn delete(&self, id: &str) -> SupabaseResult<bool> {
        let query = Query::new().eq("id", id);
        let rows: Vec<serde_json::Value> = self.client.delete(SUMMARIES_TABLE, &query).await?;
        if !rows.is_empty() {
            info!(summary_id = %id, "Deleted summary");
        }
        Ok(!rows.is_empty())
    }

    /// Lightweight probe used by readiness checks.
    pub async fn check_connectivity(&self) -> SupabaseResult<()> {
        self.client.check_connectivity(SUMMARIES_TABLE).await
    }
}

/// Repository for chat conversation rows.
#[derive(Clone)]
pub struct ConversationRepository {
    client: SupabaseClient,
}

impl ConversationRepository {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, conversation: &NewConversation) -> SupabaseResult<ConversationRecord> {
        let rows = self.client.insert(CONVERSATIONS_TABLE, conversation).await?;
        let stored: ConversationRecord = first_row(rows, CONVERSATIONS_TABLE)?;
        info!(conversation_id = %stored.id, summary_id = %stored.summary_id, "Created conversation");
        Ok(stored)
    }

    /// Conversations of a summary, newest first.
    pub async fn list_for_summary(&self, summary_id: &str) -> SupabaseResult<Vec<ConversationRecord>> {
        let query = Query::new()
            .select("*")
            .eq("summary_id", summary_id)
            .order("created_at", true);
        self.client.select(CONVERSATIONS_TABLE, &query).await
    }

    pub async fn get(&self, id: &str) -> SupabaseResult<Option<ConversationRecord>> {
        let query = Query::new().select("*").eq("id", id).limit(1);
        let rows: Vec<ConversationRecord> = self.client.select(CONVERSATIONS_TABLE, &query).await?;
        Ok(rows.into_iter().next())
    }

    /// Delete a conversation; its messages cascade in the database.
    pub async fn delete(&self, id: &str) -> SupabaseResult<bool> {
        let query = Query::new().eq("id", id);
        let rows: Vec<serde_json::Value> = self.client.delete(CONVERSATIONS_TABLE, &query).await?;
        Ok(!rows.is_empty())
    }
}

/// Repository for chat message rows.
#[derive(Clone)]
pub struct MessageRepository {
    client: SupabaseClient,
}

impl MessageRepository {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, message: &NewMessage) -> SupabaseResult<ChatMessage> {
        let rows = self.client.insert(MESSAGES_TABLE, message).await?;
        first_row(rows, MESSAGES_TABLE)
    }

    /// Messages of a conversation, oldest first.
    pub async fn list_for_conversation(&self, conversation_id: &str) -> SupabaseResult<Vec<ChatMessage>> {
        let query = Query::new()
            .select("*")
            .eq("conversation_id", conversation_id)
            .order("created_at", false);
        self.client.select(MESSAGES_TABLE, &query).await
    }
}

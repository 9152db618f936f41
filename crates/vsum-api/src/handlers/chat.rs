//! Chat handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use vsum_models::{ChatMessage, Conversation, NewConversation};

use crate::error::{ApiError, ApiResult};
use crate::services::ChatService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub conversation_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub conversation_id: String,
    pub message: ChatMessage,
}

fn chat(state: &AppState) -> ApiResult<&ChatService> {
    state.chat.as_ref().ok_or_else(ApiError::database_unavailable)
}

pub async fn create_conversation(
    State(state): State<AppState>,
    Json(request): Json<NewConversation>,
) -> ApiResult<Json<Conversation>> {
    Ok(Json(chat(&state)?.create_conversation(&request).await?))
}

pub async fn list_conversations(
    State(state): State<AppState>,
    Path(summary_id): Path<String>,
) -> ApiResult<Json<Vec<Conversation>>> {
    Ok(Json(chat(&state)?.list_conversations(&summary_id).await?))
}

pub async fn get_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> ApiResult<Json<Conversation>> {
    Ok(Json(chat(&state)?.get_conversation(&conversation_id).await?))
}

pub async fn send_message(
    State(state): State<AppState>,
    Json(request): Json<SendMessageRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let message = chat(&state)?
        .send_message(&request.conversation_id, &request.message)
        .await?;

    Ok(Json(ChatResponse {
        conversation_id: request.conversation_id,
        message,
    }))
}

pub async fn delete_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> ApiResult<Json<Value>> {
    chat(&state)?.delete_conversation(&conversation_id).await?;
    Ok(Json(json!({ "message": "Conversation deleted successfully" })))
}

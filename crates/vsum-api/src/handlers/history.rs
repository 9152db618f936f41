//! Summary history handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

use vsum_models::SummaryItem;
use vsum_supabase::SummaryRepository;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Serialize)]
pub struct HistoryResponse {
    pub summaries: Vec<SummaryItem>,
}

fn summaries(state: &AppState) -> ApiResult<&Arc<SummaryRepository>> {
    state.summaries.as_ref().ok_or_else(ApiError::database_unavailable)
}

/// All stored summaries, newest first.
pub async fn list_history(State(state): State<AppState>) -> ApiResult<Json<HistoryResponse>> {
    let rows = summaries(&state)?.list().await.map_err(|e| {
        error!(error = %e, "Error fetching summaries");
        ApiError::internal("Failed to fetch summaries")
    })?;

    Ok(Json(HistoryResponse {
        summaries: rows.into_iter().map(SummaryItem::from).collect(),
    }))
}

pub async fn get_summary(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<SummaryItem>> {
    let summary = summaries(&state)?
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Summary not found"))?;

    Ok(Json(SummaryItem::from(summary)))
}

pub async fn delete_summary(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    if summaries(&state)?.delete(&id).await? {
        Ok(Json(json!({ "message": "Summary deleted successfully" })))
    } else {
        Err(ApiError::not_found("Summary not found"))
    }
}

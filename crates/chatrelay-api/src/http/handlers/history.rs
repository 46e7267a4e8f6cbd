//! Channel history handler.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use chatrelay_types::error::ValidationError;
use chatrelay_types::message::ChatMessage;

use crate::http::error::AppError;
use crate::http::extractors::query::HistoryQuery;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub messages: Vec<ChatMessage>,
}

/// GET /messages?channel=..&before=.. - One page of history, newest first.
pub async fn list_messages(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<HistoryResponse>, AppError> {
    let Query(query) = query.map_err(|rejection| ValidationError::Malformed(rejection.body_text()))?;
    let before = query.cursor()?;

    let messages = state.history_service.page(query.channel(), before).await?;

    Ok(Json(HistoryResponse { messages }))
}

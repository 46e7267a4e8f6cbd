//! Message submission handler.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use chatrelay_types::error::ValidationError;
use chatrelay_types::message::{ChatMessage, SubmitMessageRequest};

use crate::http::error::AppError;
use crate::state::AppState;

/// Body returned for an accepted message.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub status: &'static str,
    pub message: ChatMessage,
}

/// POST /chat - Validate, persist and fan out one message.
///
/// Responds only after the hub publish has completed or failed.
pub async fn submit_message(
    State(state): State<AppState>,
    payload: Result<Json<SubmitMessageRequest>, JsonRejection>,
) -> Result<Json<SubmitResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| ValidationError::Malformed(rejection.body_text()))?;

    let message = state.relay_service.submit(request).await?;

    Ok(Json(SubmitResponse {
        status: "ok",
        message,
    }))
}

//! Application error type mapping to HTTP status codes and the error body.
//!
//! Every failure is answered with
//! `{ "error": <description>, "stage": "validation" | "persistence" | "fanout" }`.
//! A fanout failure also carries the persisted message, since it is durable
//! and will appear in history.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use chatrelay_types::error::{RelayError, RelayStage, ValidationError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Failure from the relay or history service.
    Relay(RelayError),
}

impl From<RelayError> for AppError {
    fn from(e: RelayError) -> Self {
        AppError::Relay(e)
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Relay(RelayError::Validation(e))
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Relay(e) => match e.stage() {
                RelayStage::Validation => StatusCode::BAD_REQUEST,
                RelayStage::Persistence | RelayStage::Fanout => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let AppError::Relay(err) = self;
        let stage = err.stage();

        let body = match &err {
            RelayError::Validation(e) => json!({
                "error": e.to_string(),
                "stage": stage,
            }),
            RelayError::Persistence(e) => {
                tracing::error!(relay.stage = %stage, error = %e, "Message store failure");
                json!({
                    "error": "message store unavailable",
                    "stage": stage,
                })
            }
            RelayError::Fanout { message, source } => json!({
                "error": format!("message saved but live delivery failed: {source}"),
                "stage": stage,
                "message": message,
            }),
        };

        (status, Json(body)).into_response()
    }
}

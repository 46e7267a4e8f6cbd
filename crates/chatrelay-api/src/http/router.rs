//! Axum router configuration with middleware.
//!
//! Middleware: CORS (any origin, matching the browser chat clients) and
//! per-request tracing spans tagged with a generated request ID.

use std::time::Duration;

use axum::extract::State;
use axum::http::{header, Method, Request, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use chatrelay_core::repository::message::MessageRepository;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::http::handlers;
use crate::state::AppState;

/// Browsers may cache CORS preflight results this long.
const CORS_MAX_AGE: Duration = Duration::from_secs(12 * 60 * 60);

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_LENGTH])
        .max_age(CORS_MAX_AGE);

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
        tracing::info_span!(
            "http.request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %Uuid::now_v7(),
        )
    });

    Router::new()
        .route("/chat", post(handlers::chat::submit_message))
        .route("/messages", get(handlers::history::list_messages))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(trace)
        .with_state(state)
}

/// GET /health - 200 while the message store can hand out a connection.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    match state.relay_service.repo().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "ok",
                "version": env!("CARGO_PKG_VERSION"),
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "unavailable",
                    "version": env!("CARGO_PKG_VERSION"),
                    "error": e.to_string(),
                })),
            )
        }
    }
}

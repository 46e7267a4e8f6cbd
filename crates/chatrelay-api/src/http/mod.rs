//! HTTP/REST API layer for chatrelay.
//!
//! Axum-based API with two relay endpoints (`POST /chat`, `GET /messages`)
//! plus `/health`. Errors use a flat `{ "error", "stage" }` body.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;

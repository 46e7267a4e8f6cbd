//! Fanout of persisted messages to the real-time hub.
//!
//! The relay only sees the narrow [`publisher::Publisher`] capability, so
//! delivery policies such as [`retry::RetryingPublisher`] can be layered on
//! without touching the pipeline.

pub mod publisher;
pub mod retry;

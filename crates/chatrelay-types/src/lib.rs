//! Shared domain types for chatrelay.
//!
//! This crate contains the message model exchanged between the HTTP edge,
//! the relay core, the message store and the hub publisher, together with
//! the error taxonomy and configuration structs.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod message;

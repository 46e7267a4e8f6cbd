//! Infrastructure layer for chatrelay.
//!
//! Contains implementations of the port traits defined in `chatrelay-core`:
//! the SQLite message store and the HTTP hub publisher, plus loading of
//! `RelayConfig` from file and environment.

pub mod config;
pub mod hub;
pub mod sqlite;

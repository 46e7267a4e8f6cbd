//! Relay pipeline and port trait definitions for chatrelay.
//!
//! This crate defines the "ports" (`MessageRepository`, `Publisher`) that the
//! infrastructure layer implements, plus the services built on them. It
//! depends only on `chatrelay-types` -- never on `chatrelay-infra` or any
//! database/HTTP crate.

pub mod fanout;
pub mod history;
pub mod relay;
pub mod repository;

#[cfg(test)]
pub(crate) mod testing;

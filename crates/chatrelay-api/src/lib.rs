//! HTTP surface and service wiring for the `chatrelay` binary.
//!
//! Exposed as a library so integration tests can boot the real router.

pub mod http;
pub mod state;

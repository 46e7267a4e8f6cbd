//! Real-time hub integration.
//!
//! The hub speaks the Mercure publish protocol: a form-encoded POST with
//! `topic` and `data` fields, authorized by a publisher JWT.

pub mod client;
pub mod token;

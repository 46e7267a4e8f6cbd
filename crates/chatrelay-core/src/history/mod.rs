//! Cursor-paginated retrieval of a channel's past messages.

pub mod service;

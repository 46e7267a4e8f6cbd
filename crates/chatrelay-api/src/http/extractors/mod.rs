//! Request extractors and query parameter types.

pub mod query;

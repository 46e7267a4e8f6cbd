//! Ingestion pipeline: validate, persist, then fan out.

pub mod service;
pub mod validation;

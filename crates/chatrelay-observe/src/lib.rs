//! Observability setup for chatrelay: the global tracing subscriber.

pub mod tracing_setup;

//! Publisher trait definition.

use chatrelay_types::error::PublishError;

/// Delivers one serialized message to the hub under a topic.
///
/// Implementations make a single delivery attempt per call and must bound it
/// with a timeout. Success means the hub acknowledged the publish.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait Publisher: Send + Sync {
    /// Publish `payload` to subscribers of `topic`.
    fn publish(
        &self,
        topic: &str,
        payload: &str,
    ) -> impl std::future::Future<Output = Result<(), PublishError>> + Send;
}

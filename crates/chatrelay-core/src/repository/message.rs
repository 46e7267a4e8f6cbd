//! Message store trait definition.
//!
//! The store is an append-only log partitioned by channel. The relay only
//! needs two capabilities from it: append a row and get back the assigned
//! sequence ID, and scan a channel backwards from a cursor.

use chatrelay_types::error::RepositoryError;
use chatrelay_types::message::{ChatMessage, NewMessage};

/// Repository trait for chat message persistence.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait MessageRepository: Send + Sync {
    /// Atomically append a message.
    ///
    /// The store assigns `id` (strictly increasing across all inserts) and
    /// `created_at`. The message exists if and only if this returns `Ok`.
    fn append(
        &self,
        msg: &NewMessage,
    ) -> impl std::future::Future<Output = Result<ChatMessage, RepositoryError>> + Send;

    /// Messages in `channel` ordered by `id` descending, at most `limit`.
    ///
    /// With `before = Some(cursor)` only messages with `id < cursor` are
    /// eligible; with `None` the scan starts at the newest message.
    fn scan_before(
        &self,
        channel: &str,
        before: Option<i64>,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Cheap liveness probe used by the health endpoint.
    fn ping(&self) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}

/// Lets the relay and the history reader share one store handle.
impl<T: MessageRepository> MessageRepository for std::sync::Arc<T> {
    fn append(
        &self,
        msg: &NewMessage,
    ) -> impl std::future::Future<Output = Result<ChatMessage, RepositoryError>> + Send {
        (**self).append(msg)
    }

    fn scan_before(
        &self,
        channel: &str,
        before: Option<i64>,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send {
        (**self).scan_before(channel, before, limit)
    }

    fn ping(&self) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send {
        (**self).ping()
    }
}

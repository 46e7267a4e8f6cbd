//! History reader over the message store.
//!
//! Pages run newest first. A client passes the smallest `id` it has seen as
//! `before` to fetch the next (older) page; an empty page means the start of
//! the channel has been reached.

use chatrelay_types::error::RelayError;
use chatrelay_types::message::{ChatMessage, HISTORY_PAGE_SIZE};
use tracing::debug;

use crate::relay::validation::{validate_channel, validate_cursor};
use crate::repository::message::MessageRepository;

/// Read-only access to a channel's stored messages.
pub struct HistoryService<R: MessageRepository> {
    repo: R,
}

impl<R: MessageRepository> HistoryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Access the message repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// One page of at most `HISTORY_PAGE_SIZE` messages, `id` descending.
    pub async fn page(
        &self,
        channel: &str,
        before: Option<i64>,
    ) -> Result<Vec<ChatMessage>, RelayError> {
        validate_channel(channel)?;
        validate_cursor(before)?;

        let messages = self
            .repo
            .scan_before(channel, before, HISTORY_PAGE_SIZE)
            .await
            .map_err(RelayError::Persistence)?;

        debug!(
            relay.channel = channel,
            before = ?before,
            count = messages.len(),
            "Loaded history page"
        );
        Ok(messages)
    }
}

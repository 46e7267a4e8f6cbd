//! Relay service orchestrating validation, persistence and fanout.
//!
//! The pipeline for one submission is strictly sequential:
//! validate -> append -> serialize -> publish -> respond. Persistence must
//! succeed before anything is published, and a failed publish never undoes
//! the append.

use std::sync::Arc;

use chatrelay_types::error::{PublishError, RelayError, RelayStage};
use chatrelay_types::message::{ChatMessage, SubmitMessageRequest};
use tracing::{Instrument, debug, info, warn};

use crate::fanout::publisher::Publisher;
use crate::relay::validation::validate_submission;
use crate::repository::message::MessageRepository;

/// Accepts chat messages, stores them, and announces them on the hub.
///
/// Generic over `MessageRepository` and `Publisher` to maintain clean
/// architecture (chatrelay-core never depends on chatrelay-infra).
pub struct RelayService<R: MessageRepository, P: Publisher> {
    repo: R,
    publisher: Arc<P>,
}

impl<R: MessageRepository, P: Publisher + 'static> RelayService<R, P> {
    pub fn new(repo: R, publisher: P) -> Self {
        Self {
            repo,
            publisher: Arc::new(publisher),
        }
    }

    /// Access the message repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Access the hub publisher.
    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Run one submission through the pipeline.
    ///
    /// Exactly one append is attempted. On `RelayError::Fanout` the message
    /// is already durable and is returned inside the error.
    #[tracing::instrument(
        name = "relay.submit",
        skip_all,
        fields(relay.channel = %req.channel, relay.sequence_id = tracing::field::Empty)
    )]
    pub async fn submit(&self, req: SubmitMessageRequest) -> Result<ChatMessage, RelayError> {
        let new_message = validate_submission(req).inspect_err(|e| {
            debug!(relay.stage = %RelayStage::Validation, error = %e, "Rejected submission");
        })?;

        let stored = self.repo.append(&new_message).await.map_err(|e| {
            warn!(relay.stage = %RelayStage::Persistence, error = %e, "Failed to persist message");
            RelayError::Persistence(e)
        })?;
        tracing::Span::current().record("relay.sequence_id", stored.id);
        info!(user_id = %stored.user_id, "Message persisted");

        let payload = match serde_json::to_string(&stored) {
            Ok(payload) => payload,
            Err(e) => {
                return Err(fanout_failed(stored, PublishError::Encode(e.to_string())));
            }
        };

        match self.publish_detached(stored.channel.clone(), payload).await {
            Ok(()) => {
                debug!("Message published to hub");
                Ok(stored)
            }
            Err(source) => Err(fanout_failed(stored, source)),
        }
    }

    /// Publish on a separate task so that dropping the caller's future (for
    /// example on client disconnect) does not abort an in-flight publish.
    async fn publish_detached(&self, topic: String, payload: String) -> Result<(), PublishError> {
        let publisher = Arc::clone(&self.publisher);
        let handle = tokio::spawn(
            async move { publisher.publish(&topic, &payload).await }.in_current_span(),
        );

        handle
            .await
            .map_err(|e| PublishError::Transport(format!("publish task failed: {e}")))?
    }
}

fn fanout_failed(message: ChatMessage, source: PublishError) -> RelayError {
    warn!(
        relay.stage = %RelayStage::Fanout,
        relay.sequence_id = message.id,
        error = %source,
        "Message persisted but hub publish failed"
    );
    RelayError::Fanout {
        message: Box::new(message),
        source,
    }
}

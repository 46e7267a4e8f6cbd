//! Bounded retry decorator for publishers.
//!
//! Wraps any [`Publisher`] and re-attempts transient failures with a fixed
//! backoff. With `max_attempts = 1` it behaves exactly like the wrapped
//! publisher.

use std::time::Duration;

use chatrelay_types::config::HubConfig;
use chatrelay_types::error::PublishError;
use tracing::warn;

use super::publisher::Publisher;

// ---------------------------------------------------------------------------
// RetryPolicy
// ---------------------------------------------------------------------------

/// How many times to attempt a publish and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first. Values below 1 are treated as 1.
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn from_hub_config(config: &HubConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            backoff: config.retry_backoff(),
        }
    }

    /// Whether another attempt should follow a failure.
    ///
    /// `attempt` is 1-based (first execution is attempt 1).
    pub fn should_retry(&self, attempt: u32, error: &PublishError) -> bool {
        attempt < self.max_attempts && error.is_transient()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_hub_config(&HubConfig::default())
    }
}

// ---------------------------------------------------------------------------
// RetryingPublisher
// ---------------------------------------------------------------------------

/// A [`Publisher`] that retries transient failures of an inner publisher.
///
/// Each attempt is a full publish, so the hub may see the same payload more
/// than once (at-least-once delivery).
pub struct RetryingPublisher<P: Publisher> {
    inner: P,
    policy: RetryPolicy,
}

impl<P: Publisher> RetryingPublisher<P> {
    pub fn new(inner: P, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: Publisher> Publisher for RetryingPublisher<P> {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), PublishError> {
        let mut attempt = 1;
        loop {
            match self.inner.publish(topic, payload).await {
                Ok(()) => return Ok(()),
                Err(e) if self.policy.should_retry(attempt, &e) => {
                    warn!(
                        topic,
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        error = %e,
                        "Hub publish failed, retrying"
                    );
                    tokio::time::sleep(self.policy.backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

//! HubPublisher -- concrete [`Publisher`] implementation for a Mercure hub.
//!
//! Each call makes exactly one POST to the configured endpoint. Retries, if
//! any, are layered on top with `RetryingPublisher` from chatrelay-core.
//!
//! The publisher JWT is wrapped in [`secrecy::SecretString`] and is never
//! logged or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use chatrelay_core::fanout::publisher::Publisher;
use chatrelay_types::config::HubConfig;
use chatrelay_types::error::PublishError;

/// Longest hub error body kept in a `PublishError::Rejected`.
const MAX_ERROR_BODY: usize = 512;

/// Publishes messages to a Mercure-compatible hub over HTTP.
pub struct HubPublisher {
    client: reqwest::Client,
    url: String,
    token: Option<SecretString>,
    timeout: Duration,
}

impl HubPublisher {
    /// Create a publisher for `url` with a per-request `timeout`.
    ///
    /// The URL is not validated here; a malformed or empty endpoint surfaces
    /// as `PublishError::InvalidEndpoint` on the first publish.
    pub fn new(
        url: impl Into<String>,
        token: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, PublishError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PublishError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
            token,
            timeout,
        })
    }

    /// Build a publisher from the `[hub]` config section.
    ///
    /// An empty token is treated as no token.
    pub fn from_config(config: &HubConfig) -> Result<Self, PublishError> {
        let token = config
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|t| SecretString::from(t.to_owned()));
        Self::new(config.url.clone(), token, config.publish_timeout())
    }

    fn classify(&self, err: reqwest::Error) -> PublishError {
        if err.is_timeout() {
            PublishError::Timeout(self.timeout)
        } else if err.is_builder() {
            PublishError::InvalidEndpoint(format!("{}: {err}", self.url))
        } else {
            PublishError::Transport(err.to_string())
        }
    }
}

impl std::fmt::Debug for HubPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubPublisher")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Publisher for HubPublisher {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), PublishError> {
        let mut request = self
            .client
            .post(&self.url)
            .form(&[("topic", topic), ("data", payload)]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await.map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| body.is_char_boundary(*i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(topic, status = status.as_u16(), "Hub accepted publish");
        Ok(())
    }
}

//! Configuration types for chatrelay.
//!
//! `RelayConfig` mirrors the optional `chatrelay.toml` file. Every field has a
//! default so an empty (or absent) file yields a runnable local setup.
//! Environment overrides are applied by the loader in chatrelay-infra.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration for the relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// sqlx connection string for the message store.
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Real-time hub the relay fans accepted messages out to.
    #[serde(default)]
    pub hub: HubConfig,

    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,
}

fn default_database_url() -> String {
    "sqlite://chatrelay.db?mode=rwc".to_string()
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            hub: HubConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Hub (Mercure-style) publish settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct HubConfig {
    /// Full publish endpoint, e.g. `http://localhost:3000/.well-known/mercure`.
    #[serde(default = "default_hub_url")]
    pub url: String,

    /// Bearer token attached to publish requests. Never serialized back out.
    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    /// Upper bound for a single publish request. Zero is treated as one second.
    #[serde(default = "default_publish_timeout_secs")]
    pub publish_timeout_secs: u64,

    /// Total publish attempts per message (1 = no retry).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed delay between publish attempts.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_hub_url() -> String {
    "http://localhost:3000/.well-known/mercure".to_string()
}

fn default_publish_timeout_secs() -> u64 {
    10
}

fn default_max_attempts() -> u32 {
    1
}

fn default_retry_backoff_ms() -> u64 {
    250
}

impl HubConfig {
    pub fn publish_timeout(&self) -> Duration {
        Duration::from_secs(self.publish_timeout_secs.max(1))
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            url: default_hub_url(),
            token: None,
            publish_timeout_secs: default_publish_timeout_secs(),
            max_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

// The token must never reach logs.
impl fmt::Debug for HubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubConfig")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("publish_timeout_secs", &self.publish_timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .finish()
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

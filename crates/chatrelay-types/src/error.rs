use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::message::ChatMessage;

/// Errors raised when an inbound request fails validation.
///
/// Always detected before any side effect takes place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} must be at most {max} characters, got {actual}")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("before must be a positive message id, got {0}")]
    InvalidCursor(i64),

    #[error("malformed request: {0}")]
    Malformed(String),
}

/// Errors from repository operations (used by trait definitions in chatrelay-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),
}

/// Errors from publishing a message to the real-time hub.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("hub endpoint is invalid: {0}")]
    InvalidEndpoint(String),

    #[error("hub request failed: {0}")]
    Transport(String),

    #[error("hub request timed out after {0:?}")]
    Timeout(Duration),

    #[error("hub rejected publish with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("failed to encode hub payload: {0}")]
    Encode(String),
}

impl PublishError {
    /// Whether a later attempt could plausibly succeed.
    ///
    /// Transport failures, timeouts, 429 and 5xx responses are transient;
    /// a bad endpoint, an encoding failure or any other 4xx is not.
    pub fn is_transient(&self) -> bool {
        match self {
            PublishError::Transport(_) | PublishError::Timeout(_) => true,
            PublishError::Rejected { status, .. } => *status == 429 || *status >= 500,
            PublishError::InvalidEndpoint(_) | PublishError::Encode(_) => false,
        }
    }
}

/// Errors from loading `RelayConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse config file {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("invalid value for {var}: {reason}")]
    InvalidEnv { var: &'static str, reason: String },
}

/// Pipeline stage at which a relay operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelayStage {
    Validation,
    Persistence,
    Fanout,
}

impl fmt::Display for RelayStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayStage::Validation => write!(f, "validation"),
            RelayStage::Persistence => write!(f, "persistence"),
            RelayStage::Fanout => write!(f, "fanout"),
        }
    }
}

/// Errors surfaced by the relay and history services.
///
/// Each variant names the stage that failed so callers can decide whether to
/// retry and what to tell the end user.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid message: {0}")]
    Validation(#[from] ValidationError),

    #[error("failed to save message: {0}")]
    Persistence(#[source] RepositoryError),

    /// The message was durably stored but live delivery failed. History
    /// retrieval will still return it.
    #[error("message {} saved but live delivery failed: {source}", message.id)]
    Fanout {
        message: Box<ChatMessage>,
        #[source]
        source: PublishError,
    },
}

impl RelayError {
    pub fn stage(&self) -> RelayStage {
        match self {
            RelayError::Validation(_) => RelayStage::Validation,
            RelayError::Persistence(_) => RelayStage::Persistence,
            RelayError::Fanout { .. } => RelayStage::Fanout,
        }
    }
}

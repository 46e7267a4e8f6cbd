//! Chat message domain types.
//!
//! `SubmitMessageRequest` is the raw inbound shape accepted at the HTTP edge,
//! `NewMessage` is a request that passed validation, and `ChatMessage` is a
//! row the store has durably appended (sequence ID and timestamp assigned).
//!
//! The wire format keeps the field names existing chat clients already speak:
//! `channel`, `user_id`, `message` (the body) and `is_read`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of a channel name, in characters.
pub const MAX_CHANNEL_LEN: usize = 100;

/// Maximum length of a sender ID, in characters.
pub const MAX_USER_ID_LEN: usize = 50;

/// Number of messages returned per history page.
pub const HISTORY_PAGE_SIZE: u32 = 20;

/// A message as submitted by a client, before validation.
///
/// Every field defaults so that a missing field surfaces as a validation
/// error naming the field rather than as an opaque JSON rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitMessageRequest {
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default, rename = "message")]
    pub body: String,
    #[serde(default)]
    pub is_read: bool,
}

/// A validated message ready to be appended to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub channel: String,
    pub user_id: String,
    pub body: String,
    pub is_read: bool,
}

impl NewMessage {
    /// Attach the store-assigned sequence ID and timestamp.
    pub fn into_persisted(self, id: i64, created_at: DateTime<Utc>) -> ChatMessage {
        ChatMessage {
            id,
            channel: self.channel,
            user_id: self.user_id,
            body: self.body,
            is_read: self.is_read,
            created_at,
        }
    }
}

/// A message durably appended to the store.
///
/// Immutable once persisted. `id` is the store-assigned sequence ID and is
/// strictly increasing; clients use it as the history pagination cursor.
/// Field order here is the serialization order on the wire and to the hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub channel: String,
    pub user_id: String,
    #[serde(rename = "message")]
    pub body: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

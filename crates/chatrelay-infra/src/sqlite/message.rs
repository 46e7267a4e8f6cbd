//! SQLite message repository implementation.
//!
//! Implements `MessageRepository` from `chatrelay-core` using sqlx with split
//! read/write pools. Appends go through the single writer connection, so
//! `id` assignment and `created_at` stamping happen in one serialized step.

use chatrelay_core::repository::message::MessageRepository;
use chatrelay_types::error::RepositoryError;
use chatrelay_types::message::{ChatMessage, NewMessage};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sqlx::{QueryBuilder, Row, Sqlite};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `MessageRepository`.
#[derive(Clone)]
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }
}

// ---------------------------------------------------------------------------
// Internal row types
// ---------------------------------------------------------------------------

struct MessageRow {
    id: i64,
    channel: String,
    user_id: String,
    message: String,
    is_read: bool,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            channel: row.try_get("channel")?,
            user_id: row.try_get("user_id")?,
            message: row.try_get("message")?,
            is_read: row.try_get("is_read")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        Ok(ChatMessage {
            id: self.id,
            channel: self.channel,
            user_id: self.user_id,
            body: self.message,
            is_read: self.is_read,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const SELECT_COLUMNS: &str = "SELECT id, channel, user_id, message, is_read, created_at FROM messages";

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Builds the one channel scan the store supports.
///
/// The cursor predicate lives only here: with `before` set, only rows with
/// a strictly smaller `id` are eligible.
fn scan_query<'a>(channel: &'a str, before: Option<i64>, limit: u32) -> QueryBuilder<'a, Sqlite> {
    let mut qb = QueryBuilder::new(SELECT_COLUMNS);
    qb.push(" WHERE channel = ").push_bind(channel);
    if let Some(cursor) = before {
        qb.push(" AND id < ").push_bind(cursor);
    }
    qb.push(" ORDER BY id DESC LIMIT ").push_bind(i64::from(limit));
    qb
}

// ---------------------------------------------------------------------------
// MessageRepository impl
// ---------------------------------------------------------------------------

impl MessageRepository for SqliteMessageRepository {
    async fn append(&self, msg: &NewMessage) -> Result<ChatMessage, RepositoryError> {
        // Stored at microsecond precision, so truncate before returning to
        // keep the appended value identical to what history reads back.
        let created_at = Utc::now().trunc_subsecs(6);

        let id: i64 = sqlx::query_scalar(
            r#"INSERT INTO messages (channel, user_id, message, is_read, created_at)
               VALUES (?, ?, ?, ?, ?)
               RETURNING id"#,
        )
        .bind(&msg.channel)
        .bind(&msg.user_id)
        .bind(&msg.body)
        .bind(msg.is_read)
        .bind(format_datetime(&created_at))
        .fetch_one(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(msg.clone().into_persisted(id, created_at))
    }

    async fn scan_before(
        &self,
        channel: &str,
        before: Option<i64>,
        limit: u32,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = scan_query(channel, before, limit)
            .build()
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut msgs = Vec::with_capacity(rows.len());
        for row in &rows {
            let r = MessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            msgs.push(r.into_message()?);
        }
        Ok(msgs)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.pool
            .writer
            .acquire()
            .await
            .map(|_| ())
            .map_err(|e| RepositoryError::Connection(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

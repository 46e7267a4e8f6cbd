//! In-memory test doubles for the core ports.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chatrelay_types::error::{PublishError, RepositoryError};
use chatrelay_types::message::{ChatMessage, NewMessage};
use chrono::Utc;

use crate::fanout::publisher::Publisher;
use crate::repository::message::MessageRepository;

/// Vec-backed message store with a store-wide sequence counter.
#[derive(Default)]
pub struct InMemoryRepository {
    rows: Mutex<Vec<ChatMessage>>,
    fail_appends: bool,
    appends: AtomicUsize,
    scans: AtomicUsize,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every append fails with a connection error.
    pub fn failing() -> Self {
        Self {
            fail_appends: true,
            ..Self::default()
        }
    }

    pub fn append_calls(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }

    pub fn scan_calls(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

impl MessageRepository for InMemoryRepository {
    async fn append(&self, msg: &NewMessage) -> Result<ChatMessage, RepositoryError> {
        self.appends.fetch_add(1, Ordering::SeqCst);
        if self.fail_appends {
            return Err(RepositoryError::Connection("database is locked".to_string()));
        }
        let mut rows = self.rows.lock().unwrap();
        let id = rows.last().map_or(1, |m| m.id + 1);
        let stored = msg.clone().into_persisted(id, Utc::now());
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn scan_before(
        &self,
        channel: &str,
        before: Option<i64>,
        limit: u32,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .rev()
            .filter(|m| m.channel == channel)
            .filter(|m| before.is_none_or(|cursor| m.id < cursor))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

/// Publisher that replays scripted outcomes, then succeeds, recording every call.
///
/// A call is recorded once its (optional) delay has elapsed.
#[derive(Default)]
pub struct ScriptedPublisher {
    outcomes: Mutex<VecDeque<Result<(), PublishError>>>,
    calls: Mutex<Vec<(String, String)>>,
    delay: Duration,
}

impl ScriptedPublisher {
    pub fn new(outcomes: Vec<Result<(), PublishError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        }
    }

    /// An accepting publisher that takes `delay` to answer.
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    /// A publisher that accepts everything.
    pub fn accepting() -> Self {
        Self::default()
    }

    /// A publisher whose hub is unreachable.
    pub fn unreachable() -> Self {
        Self::new(vec![Err(PublishError::Transport(
            "connection refused".to_string(),
        ))])
    }

    /// `(topic, payload)` pairs in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Publisher for ScriptedPublisher {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), PublishError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.calls
            .lock()
            .unwrap()
            .push((topic.to_string(), payload.to_string()));
        self.outcomes.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over the store and publisher traits, but AppState
//! pins them to the concrete infra implementations.

use std::sync::Arc;

use anyhow::Context;
use chatrelay_core::fanout::retry::{RetryPolicy, RetryingPublisher};
use chatrelay_core::history::service::HistoryService;
use chatrelay_core::relay::service::RelayService;
use chatrelay_infra::hub::client::HubPublisher;
use chatrelay_infra::sqlite::message::SqliteMessageRepository;
use chatrelay_infra::sqlite::pool::DatabasePool;
use chatrelay_types::config::RelayConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteRelayService = RelayService<SqliteMessageRepository, RetryingPublisher<HubPublisher>>;

pub type ConcreteHistoryService = HistoryService<SqliteMessageRepository>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub relay_service: Arc<ConcreteRelayService>,
    pub history_service: Arc<ConcreteHistoryService>,
    pub db_pool: DatabasePool,
    pub config: Arc<RelayConfig>,
}

impl AppState {
    /// Initialize the application state: open the store, wire services.
    ///
    /// The hub is not contacted here; a bad hub URL or token shows up as a
    /// fanout failure on the first submission.
    pub async fn init(config: RelayConfig) -> anyhow::Result<Self> {
        let db_pool = DatabasePool::new(&config.database_url)
            .await
            .with_context(|| format!("failed to open message store {}", config.database_url))?;

        let repo = SqliteMessageRepository::new(db_pool.clone());

        let hub = HubPublisher::from_config(&config.hub)?;
        let publisher = RetryingPublisher::new(hub, RetryPolicy::from_hub_config(&config.hub));

        tracing::info!(hub = ?config.hub, "Relay services initialized");

        Ok(Self {
            relay_service: Arc::new(RelayService::new(repo.clone(), publisher)),
            history_service: Arc::new(HistoryService::new(repo)),
            db_pool,
            config: Arc::new(config),
        })
    }
}

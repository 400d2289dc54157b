//! Bot fleet manager
//!
//! Manages a fleet of trading-bot containers and reconciles their event
//! streams into margin, order and position views.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture with clear separation of concerns:
//!
//! - **Domain**: Entities (Bot, Order, Position, MarginRecord), message
//!   normalization and the pure aggregation services
//! - **Application**: Use cases (upload, initialize, margin/orders/positions
//!   views) and port interfaces (LedgerStore, MessageSource, ContainerRuntime)
//! - **Infrastructure**: In-memory ledger store, queue-backed message source,
//!   Docker Engine runtime, configuration
//! - **Presentation**: REST API under `/bot_manager`
//!
//! # Example
//!
//! ```ignore
//! use shoal_manager::{Manager, ManagerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let manager = Manager::new(ManagerConfig::default());
//!     manager.run().await.unwrap();
//! }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types
pub use domain::entities::{
    Bot, BotCredentials, BotId, BotStatus, MarginRecord, Order, OrderStatus, Position,
    PositionSide, Side,
};
pub use domain::messages::{EventBody, EventMessage, NormalizeError, normalize, normalize_batch};
pub use domain::services::{
    BotOrderBook, BotPositions, MarginPoint, MarginView, Resolution, aggregate_orders, day_key,
    group_by_exchange, resolve_positions,
};

pub use application::{
    ContainerRuntime, ContainerSpec, LedgerStore, LedgerWriter, MessageSource, RuntimeError,
    StoreError, TableSet, Topic, TransportError,
};

pub use infrastructure::{
    ConfigError, DockerCliRuntime, InMemoryLedgerStore, ManagerConfig, QueueMessageSource,
};

pub use presentation::{ApiError, AppState, create_router};

use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// The bot manager server
pub struct Manager {
    pub config: ManagerConfig,
    pub store: Arc<InMemoryLedgerStore>,
    pub source: Arc<QueueMessageSource>,
    pub runtime: Arc<dyn ContainerRuntime>,
}

impl Manager {
    /// Create a manager backed by the Docker Engine on the configured socket
    pub fn new(config: ManagerConfig) -> Self {
        let runtime = Arc::new(DockerCliRuntime::new(
            config.docker.socket.clone(),
            config.docker.api_version.clone(),
        ));
        Self::with_runtime(config, runtime)
    }

    /// Create a manager with an alternative container runtime (for testing)
    pub fn with_runtime(config: ManagerConfig, runtime: Arc<dyn ContainerRuntime>) -> Self {
        Manager {
            config,
            store: Arc::new(InMemoryLedgerStore::new()),
            source: Arc::new(QueueMessageSource::new()),
            runtime,
        }
    }

    /// Create the REST API router
    pub fn router(&self) -> Router {
        let state = Arc::new(AppState::new(
            Arc::clone(&self.store),
            Arc::clone(&self.source),
            Arc::clone(&self.runtime),
            self.config.clone(),
        ));

        create_router(state)
    }

    /// Run the manager server
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = format!("{}:{}", self.config.server.host, self.config.server.port);
        let router = self.router();

        tracing::info!("Bot manager listening on {}", addr);

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}

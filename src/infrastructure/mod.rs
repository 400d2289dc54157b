pub mod config;
pub mod consumer;
pub mod repositories;
pub mod runtime;

pub use config::{ConfigError, DockerConfig, ManagerConfig, ServerConfig};
pub use consumer::QueueMessageSource;
pub use repositories::InMemoryLedgerStore;
pub use runtime::DockerCliRuntime;

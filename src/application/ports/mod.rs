mod container_runtime;
mod ledger_store;
mod message_source;

pub use container_runtime::{ContainerRuntime, ContainerSpec, RuntimeError};
pub use ledger_store::{LedgerStore, StoreError, TableSet};
pub use message_source::{MessageSource, Topic, TransportError};

use async_trait::async_trait;
use thiserror::Error;

/// Named streams the manager consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Margin,
    Orders,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Margin => "margin",
            Topic::Orders => "orders",
        }
    }
}

/// Message transport failure
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("message source unreachable: {0}")]
    Unreachable(String),
}

/// Pull-based message source with at-least-once delivery and no ordering
/// guarantee across partitions.
///
/// One `fetch` returns the finite backlog currently available for a topic;
/// there is no continuous subscription. Messages are raw JSON-encoded text
/// and may be duplicated or late — the ledger writer is responsible for
/// making their application idempotent.
#[async_trait]
pub trait MessageSource: Send + Sync {
    async fn fetch(&self, topic: Topic) -> Result<Vec<String>, TransportError>;
}

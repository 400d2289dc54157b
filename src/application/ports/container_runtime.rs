use async_trait::async_trait;
use thiserror::Error;

/// Everything needed to bring up one bot container
#[derive(Debug, Clone)]
pub struct ContainerSpec {
    /// Container name; equals the bot id
    pub name: String,
    /// Strategy baseline image reference
    pub image: String,
    /// Port exposed and host-bound for the bot
    pub port: u16,
    /// Host path of the strategy file to bind-mount
    pub strategy_path: String,
    /// Backend bridge network to attach
    pub network: String,
    /// Environment passed to the container
    pub env: Vec<(String, String)>,
}

/// Container runtime failure
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("container runtime unavailable: {0}")]
    Unavailable(String),

    #[error("container runtime call failed: {0}")]
    CommandFailed(String),
}

/// Best-effort container launcher.
///
/// Launching is an explicit two-phase command: `create` then `start`, each
/// returning its own `Result`. Callers are expected to log failures rather
/// than swallow them, even when the HTTP response does not block on the
/// launch.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    async fn create(&self, spec: &ContainerSpec) -> Result<(), RuntimeError>;

    async fn start(&self, name: &str) -> Result<(), RuntimeError>;
}

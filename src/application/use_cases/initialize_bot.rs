use std::sync::Arc;

use thiserror::Error;

use crate::application::ports::{ContainerRuntime, ContainerSpec, LedgerStore, StoreError};
use crate::domain::entities::BotStatus;

/// Launch parameters shared by every bot container
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    pub image: String,
    pub network: String,
    /// Host directory holding the uploaded strategy files
    pub strategies_dir: String,
}

#[derive(Debug, Clone)]
pub struct InitializeBotCommand {
    pub bot_id: String,
}

#[derive(Debug, Error)]
pub enum InitializeError {
    #[error("invalid payload: {0}")]
    Validation(String),

    #[error("unknown bot: {0}")]
    UnknownBot(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Brings up a bot container for an uploaded strategy.
///
/// The launch itself is best-effort and detached from the request: the
/// create and start phases each return their own `Result`, and a failure in
/// either is logged rather than surfaced in the HTTP response.
pub struct InitializeBotUseCase<S: LedgerStore> {
    store: Arc<S>,
    runtime: Arc<dyn ContainerRuntime>,
    launch: LaunchConfig,
}

impl<S: LedgerStore> InitializeBotUseCase<S> {
    pub fn new(store: Arc<S>, runtime: Arc<dyn ContainerRuntime>, launch: LaunchConfig) -> Self {
        Self {
            store,
            runtime,
            launch,
        }
    }

    pub async fn execute(&self, command: InitializeBotCommand) -> Result<BotStatus, InitializeError> {
        if command.bot_id.trim().is_empty() {
            return Err(InitializeError::Validation(
                "'botId' must not be empty".to_string(),
            ));
        }

        let bot = self
            .store
            .bot(&command.bot_id)
            .await?
            .ok_or_else(|| InitializeError::UnknownBot(command.bot_id.clone()))?;

        let spec = ContainerSpec {
            name: bot.bot_id.clone(),
            image: self.launch.image.clone(),
            port: bot.port,
            strategy_path: format!("{}/{}.js", self.launch.strategies_dir, bot.bot_id),
            network: self.launch.network.clone(),
            env: vec![
                ("BOTNAME".to_string(), bot.bot_id.clone()),
                ("PORT".to_string(), bot.port.to_string()),
                ("PAIR".to_string(), bot.pair.join(",")),
            ],
        };

        let runtime = Arc::clone(&self.runtime);
        tokio::spawn(async move {
            if let Err(err) = runtime.create(&spec).await {
                tracing::warn!(bot_id = %spec.name, %err, "container create failed");
            }
            if let Err(err) = runtime.start(&spec.name).await {
                tracing::warn!(bot_id = %spec.name, %err, "container start failed");
            }
        });

        // The strategy has not been started, only its container: the bot
        // stays in Stop until told to run.
        Ok(bot.status)
    }
}

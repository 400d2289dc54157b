use std::path::PathBuf;
use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::application::ports::{LedgerStore, StoreError};
use crate::domain::entities::{Bot, BotCredentials, BotStatus};

/// Everything required to bring a new bot under management
#[derive(Debug, Clone)]
pub struct UploadBotCommand {
    pub bot_id: String,
    pub strategy: String,
    pub api_key_id: String,
    pub api_key_secret: String,
    pub exchange: String,
    pub port_number: u16,
    pub pair: Vec<String>,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("invalid upload payload: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to write strategy file: {0}")]
    StrategyFile(#[from] std::io::Error),
}

/// Registers a bot: credentials and strategy row in the store, strategy
/// blob on disk for the container bind-mount.
pub struct UploadBotUseCase<S: LedgerStore> {
    store: Arc<S>,
    strategies_dir: PathBuf,
}

impl<S: LedgerStore> UploadBotUseCase<S> {
    pub fn new(store: Arc<S>, strategies_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            strategies_dir: strategies_dir.into(),
        }
    }

    pub async fn execute(&self, command: UploadBotCommand) -> Result<(), UploadError> {
        validate(&command)?;

        self.store
            .insert_bot_keys(BotCredentials {
                bot_id: command.bot_id.clone(),
                api_key_id: command.api_key_id,
                api_key_secret: command.api_key_secret,
                exchange: command.exchange,
            })
            .await?;

        self.store
            .insert_bot(Bot {
                bot_id: command.bot_id.clone(),
                strategy: command.strategy.clone(),
                margin: Decimal::ZERO,
                pair: command.pair,
                port: command.port_number,
                status: BotStatus::Stop,
            })
            .await?;

        tokio::fs::create_dir_all(&self.strategies_dir).await?;
        let path = self.strategies_dir.join(format!("{}.js", command.bot_id));
        tokio::fs::write(&path, command.strategy.as_bytes()).await?;
        tracing::info!(bot_id = %command.bot_id, path = %path.display(), "strategy uploaded");

        Ok(())
    }
}

fn validate(command: &UploadBotCommand) -> Result<(), UploadError> {
    let required = [
        ("botId", &command.bot_id),
        ("strategy", &command.strategy),
        ("apiKeyId", &command.api_key_id),
        ("apiKeySecret", &command.api_key_secret),
        ("exchange", &command.exchange),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(UploadError::Validation(format!("'{field}' must not be empty")));
        }
    }
    if command.port_number == 0 {
        return Err(UploadError::Validation(
            "'portNumber' must be a non-zero port".to_string(),
        ));
    }
    Ok(())
}

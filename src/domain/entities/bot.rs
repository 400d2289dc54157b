use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Unique identifier for a bot, chosen by the operator at upload time.
///
/// Bot ids double as container names, so they are plain strings rather than
/// UUIDs.
pub type BotId = String;

/// Lifecycle state of a bot container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BotStatus {
    /// Uploaded but not executing its strategy
    Stop,
    /// Actively trading
    Run,
}

/// A registered trading bot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bot {
    pub bot_id: BotId,
    /// Opaque strategy code blob, written to disk for the container mount
    pub strategy: String,
    /// Current margin balance, overwritten by the ledger writer
    pub margin: Decimal,
    /// Watched `<timeframe><instrument>` strings, e.g. "1mXBTUSD"
    pub pair: Vec<String>,
    /// Port the bot container is reachable at
    pub port: u16,
    pub status: BotStatus,
}

/// Exchange API credentials held for a bot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotCredentials {
    pub bot_id: BotId,
    pub api_key_id: String,
    pub api_key_secret: String,
    pub exchange: String,
}

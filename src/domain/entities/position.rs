use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::BotId;

/// Position side, named by the side that opened the exposure:
/// a position opened by a Buy and closed by a Sell is Long, one opened by a
/// Sell and closed by a Buy is Short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    /// Returns the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            PositionSide::Long => PositionSide::Short,
            PositionSide::Short => PositionSide::Long,
        }
    }
}

/// A position derived by the resolver from matched fills.
///
/// Closed positions carry the realized economics of one match event; open
/// positions represent residual exposure still waiting for an opposing fill
/// (`end_time` is None and `profit_loss`/`roe` are zero until then).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub position_id: Uuid,
    pub bot_id: BotId,
    pub entry_price: Decimal,
    pub init_margin: Decimal,
    pub start_time: DateTime<Utc>,
    /// None while the exposure is still open
    pub end_time: Option<DateTime<Utc>>,
    pub side: PositionSide,
    pub size: Decimal,
    /// Realized P&L of the matched size; zero for open positions
    pub profit_loss: Decimal,
    /// Return on equity: profit_loss / init_margin
    pub roe: Decimal,
    pub leverage: Decimal,
    pub average_price: Decimal,
}

impl Position {
    /// Returns true while the exposure has not been fully closed
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }
}

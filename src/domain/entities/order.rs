use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BotId, OrderStatus, Side};

/// A persisted order row.
///
/// Orders are created exclusively on the order-placed path; the status
/// stream only ever mutates `status`. `position_ref` is assigned once the
/// position resolver has folded the order into a position, which eventually
/// happens for every filled order (open residual exposure is represented by
/// an open position).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub bot_id: BotId,
    pub exchange: String,
    /// Exchange-assigned id, unique across the fleet
    pub order_id: String,
    /// Back-reference to the position this order was folded into
    pub position_ref: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "order_status")]
    pub status: OrderStatus,
    pub side: Side,
    pub size: Decimal,
    pub price: Decimal,
    pub margin: Decimal,
    pub leverage: Decimal,
    pub order_type: String,
    pub average_price: Decimal,
}

impl Order {
    /// Create a new order as observed on the order-placed path
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        bot_id: impl Into<BotId>,
        exchange: impl Into<String>,
        order_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        status: OrderStatus,
        side: Side,
        size: Decimal,
        price: Decimal,
        margin: Decimal,
        leverage: Decimal,
    ) -> Self {
        Self {
            bot_id: bot_id.into(),
            exchange: exchange.into(),
            order_id: order_id.into(),
            position_ref: None,
            timestamp,
            status,
            side,
            size,
            price,
            margin,
            leverage,
            order_type: "Limit".to_string(),
            average_price: price,
        }
    }
}

//! Inbound event decoding and normalization.
//!
//! The margin and order-status producers do not agree on field casing
//! (`botId` vs `bot_id`, `orderID` vs `order_id`), so decoding is
//! alias-tolerant. The payload shape decides the message kind: an object
//! carrying `amount` is a margin snapshot, an array is a batch of
//! order-status line items, and anything else is rejected explicitly rather
//! than silently misread.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::entities::{BotId, OrderStatus};

/// Decoding failure for a raw message
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("malformed event message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unrecognized payload shape from exchange '{exchange}'")]
    UnrecognizedShape { exchange: String },
}

/// Envelope shared by both producers.
///
/// A missing bot id is not an error: the message is still applied, it just
/// cannot be attributed to a bot grouping.
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(default, alias = "botId")]
    bot_id: Option<BotId>,
    exchange: String,
    data: Value,
}

/// Margin snapshot payload
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MarginUpdate {
    pub amount: Decimal,
}

/// One order-status line item
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderStatusUpdate {
    #[serde(alias = "orderID", alias = "orderId")]
    pub order_id: String,
    #[serde(alias = "ordStatus")]
    pub order_status: OrderStatus,
}

/// Normalized message body, tagged by kind
#[derive(Debug, Clone, PartialEq)]
pub enum EventBody {
    Margin(MarginUpdate),
    Orders(Vec<OrderStatusUpdate>),
}

/// One normalized inbound message
#[derive(Debug, Clone, PartialEq)]
pub struct EventMessage {
    pub bot_id: Option<BotId>,
    pub exchange: String,
    pub body: EventBody,
}

/// Decode one raw JSON message into its normalized form. No side effects.
pub fn normalize(raw: &str) -> Result<EventMessage, NormalizeError> {
    let RawEnvelope {
        bot_id,
        exchange,
        data,
    } = serde_json::from_str(raw)?;

    let is_margin = data
        .as_object()
        .is_some_and(|fields| fields.contains_key("amount"));

    let body = if is_margin {
        EventBody::Margin(serde_json::from_value(data)?)
    } else if data.is_array() {
        EventBody::Orders(serde_json::from_value(data)?)
    } else {
        return Err(NormalizeError::UnrecognizedShape { exchange });
    };

    Ok(EventMessage {
        bot_id,
        exchange,
        body,
    })
}

/// Decode a whole fetched batch, failing on the first bad message
pub fn normalize_batch(raw: &[String]) -> Result<Vec<EventMessage>, NormalizeError> {
    raw.iter().map(|message| normalize(message)).collect()
}

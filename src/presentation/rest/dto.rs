use serde::{Deserialize, Serialize};

use crate::domain::entities::{BotId, BotStatus, Order, Position};
use crate::domain::services::{BotOrderBook, BotPositions, MarginView};

/// Uniform success envelope: every endpoint answers `{"data": ...}`
#[derive(Debug, Clone, Serialize)]
pub struct Data<T> {
    pub data: T,
}

impl<T> Data<T> {
    pub fn new(data: T) -> Self {
        Data { data }
    }
}

/// Request to bring a new bot under management
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub bot_id: String,
    pub strategy: String,
    pub api_key_id: String,
    pub api_key_secret: String,
    pub exchange: String,
    pub port_number: u16,
    #[serde(default)]
    pub pair: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub bot_id: String,
    pub upload: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeRequest {
    pub bot_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResponse {
    pub bot_id: String,
    pub status: BotStatus,
}

/// Margin view response body; the inner key is part of the public contract
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginResponse {
    pub margin_response_object: MarginView,
}

/// One bot's orders; the snake-case `bot_id` key matches the producers'
/// casing for this endpoint
#[derive(Debug, Clone, Serialize)]
pub struct OrdersEntry {
    pub bot_id: BotId,
    pub orders: OrdersBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrdersBody {
    pub open: Vec<Order>,
    pub filled: Vec<Order>,
}

impl From<BotOrderBook> for OrdersEntry {
    fn from(book: BotOrderBook) -> Self {
        OrdersEntry {
            bot_id: book.bot_id,
            orders: OrdersBody {
                open: book.open,
                filled: book.filled,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionsEntry {
    pub bot_id: BotId,
    pub positions: PositionsBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct PositionsBody {
    pub long: Vec<Position>,
    pub short: Vec<Position>,
}

impl From<BotPositions> for PositionsEntry {
    fn from(book: BotPositions) -> Self {
        PositionsEntry {
            bot_id: book.bot_id,
            positions: PositionsBody {
                long: book.long,
                short: book.short,
            },
        }
    }
}

/// `?type=` query on the positions endpoint
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PositionsQuery {
    #[serde(rename = "type", default)]
    pub table: Option<String>,
}

//! Per-bot order book views.

use serde::Serialize;

use crate::domain::entities::{BotId, Order, OrderStatus};

/// One bot's orders partitioned by status, in original fetch order
#[derive(Debug, Clone, Serialize)]
pub struct BotOrderBook {
    pub bot_id: BotId,
    pub open: Vec<Order>,
    pub filled: Vec<Order>,
}

/// Group orders per bot into open/filled partitions.
///
/// Single pass preserving first-seen bot order; no re-sorting, so the output
/// is deterministic for a fixed fetch order. A bot appears on its first
/// order regardless of that order's status, and orders in other states are
/// left out of both partitions.
pub fn aggregate_orders(orders: &[Order]) -> Vec<BotOrderBook> {
    let mut books: Vec<BotOrderBook> = Vec::new();

    for order in orders {
        let slot = match books.iter().position(|book| book.bot_id == order.bot_id) {
            Some(index) => index,
            None => {
                books.push(BotOrderBook {
                    bot_id: order.bot_id.clone(),
                    open: Vec::new(),
                    filled: Vec::new(),
                });
                books.len() - 1
            }
        };

        match order.status {
            OrderStatus::Open => books[slot].open.push(order.clone()),
            OrderStatus::Filled => books[slot].filled.push(order.clone()),
            _ => {}
        }
    }

    books
}

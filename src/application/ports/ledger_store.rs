use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::{Bot, BotCredentials, MarginRecord, Order, OrderStatus, Position};

/// Storage failure, surfaced to the caller untouched.
///
/// Retries belong to the transport/consumer collaborator, never to the
/// reconciliation core.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unreachable: {0}")]
    Unreachable(String),

    #[error("constraint violation: {0}")]
    Constraint(String),
}

/// Which table set a read or write targets.
///
/// Paper trading keeps a parallel set of order/position tables so simulated
/// flow never mixes with live flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableSet {
    Live,
    Paper,
}

/// Row-oriented store for bots, orders, positions and margin records.
///
/// Every operation is independently atomic; nothing here is transactionally
/// grouped. The order-status methods operate on the live table set — the
/// status stream only ever concerns live orders.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn insert_bot_keys(&self, credentials: BotCredentials) -> Result<(), StoreError>;

    /// Insert or overwrite a bot row (row-level upsert semantics)
    async fn insert_bot(&self, bot: Bot) -> Result<(), StoreError>;

    async fn bot(&self, bot_id: &str) -> Result<Option<Bot>, StoreError>;

    /// Overwrite the bot's current margin balance; unknown bots are a no-op
    async fn update_bot_margin(&self, bot_id: &str, amount: Decimal) -> Result<(), StoreError>;

    /// Existence check for the daily margin record, keyed by (amount, date)
    async fn margin_record_exists(
        &self,
        amount: Decimal,
        date: NaiveDate,
    ) -> Result<bool, StoreError>;

    async fn insert_margin_record(&self, record: MarginRecord) -> Result<(), StoreError>;

    /// All margin records in insertion order
    async fn margin_records(&self) -> Result<Vec<MarginRecord>, StoreError>;

    /// Insert one order row (the order-placed path)
    async fn insert_order(&self, set: TableSet, order: Order) -> Result<(), StoreError>;

    /// Full scan in insertion order
    async fn orders(&self, set: TableSet) -> Result<Vec<Order>, StoreError>;

    /// Stored status of a live order, if the order is known
    async fn order_status(&self, order_id: &str) -> Result<Option<OrderStatus>, StoreError>;

    async fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<(), StoreError>;

    /// Point the order at the position it was folded into
    async fn set_position_ref(
        &self,
        set: TableSet,
        order_id: &str,
        position_id: Uuid,
    ) -> Result<(), StoreError>;

    /// Replace the derived position rows for one table set
    async fn replace_positions(
        &self,
        set: TableSet,
        positions: Vec<Position>,
    ) -> Result<(), StoreError>;
}

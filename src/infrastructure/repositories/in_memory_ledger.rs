use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::application::ports::{LedgerStore, StoreError, TableSet};
use crate::domain::entities::{Bot, BotCredentials, BotId, MarginRecord, Order, OrderStatus, Position};

/// In-memory ledger store.
///
/// Bots and credentials live in DashMaps; order, position and margin tables
/// are plain vectors behind RwLocks because scans must come back in
/// insertion order — the aggregators are only deterministic for a fixed
/// fetch order. Each method is independently atomic, matching the row-level
/// upsert semantics the reconciliation core assumes.
pub struct InMemoryLedgerStore {
    bots: DashMap<BotId, Bot>,
    credentials: DashMap<BotId, BotCredentials>,
    margin_records: RwLock<Vec<MarginRecord>>,
    live_orders: RwLock<Vec<Order>>,
    paper_orders: RwLock<Vec<Order>>,
    live_positions: RwLock<Vec<Position>>,
    paper_positions: RwLock<Vec<Position>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self {
            bots: DashMap::new(),
            credentials: DashMap::new(),
            margin_records: RwLock::new(Vec::new()),
            live_orders: RwLock::new(Vec::new()),
            paper_orders: RwLock::new(Vec::new()),
            live_positions: RwLock::new(Vec::new()),
            paper_positions: RwLock::new(Vec::new()),
        }
    }

    fn order_table(&self, set: TableSet) -> &RwLock<Vec<Order>> {
        match set {
            TableSet::Live => &self.live_orders,
            TableSet::Paper => &self.paper_orders,
        }
    }

    fn position_table(&self, set: TableSet) -> &RwLock<Vec<Position>> {
        match set {
            TableSet::Live => &self.live_positions,
            TableSet::Paper => &self.paper_positions,
        }
    }

    /// Stored credentials for a bot (not part of the port; used by tests
    /// and future key-rotation tooling)
    pub fn credentials(&self, bot_id: &str) -> Option<BotCredentials> {
        self.credentials.get(bot_id).map(|c| c.value().clone())
    }

    /// Derived position rows for one table set
    pub fn positions(&self, set: TableSet) -> Vec<Position> {
        self.position_table(set).read().clone()
    }
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn insert_bot_keys(&self, credentials: BotCredentials) -> Result<(), StoreError> {
        self.credentials
            .insert(credentials.bot_id.clone(), credentials);
        Ok(())
    }

    async fn insert_bot(&self, bot: Bot) -> Result<(), StoreError> {
        self.bots.insert(bot.bot_id.clone(), bot);
        Ok(())
    }

    async fn bot(&self, bot_id: &str) -> Result<Option<Bot>, StoreError> {
        Ok(self.bots.get(bot_id).map(|b| b.value().clone()))
    }

    async fn update_bot_margin(&self, bot_id: &str, amount: Decimal) -> Result<(), StoreError> {
        // unknown bot ids update zero rows, same as the SQL counterpart
        if let Some(mut bot) = self.bots.get_mut(bot_id) {
            bot.margin = amount;
        }
        Ok(())
    }

    async fn margin_record_exists(
        &self,
        amount: Decimal,
        date: NaiveDate,
    ) -> Result<bool, StoreError> {
        Ok(self
            .margin_records
            .read()
            .iter()
            .any(|record| record.amount == amount && record.date == date))
    }

    async fn insert_margin_record(&self, record: MarginRecord) -> Result<(), StoreError> {
        self.margin_records.write().push(record);
        Ok(())
    }

    async fn margin_records(&self) -> Result<Vec<MarginRecord>, StoreError> {
        Ok(self.margin_records.read().clone())
    }

    async fn insert_order(&self, set: TableSet, order: Order) -> Result<(), StoreError> {
        self.order_table(set).write().push(order);
        Ok(())
    }

    async fn orders(&self, set: TableSet) -> Result<Vec<Order>, StoreError> {
        Ok(self.order_table(set).read().clone())
    }

    async fn order_status(&self, order_id: &str) -> Result<Option<OrderStatus>, StoreError> {
        Ok(self
            .live_orders
            .read()
            .iter()
            .find(|order| order.order_id == order_id)
            .map(|order| order.status))
    }

    async fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<(), StoreError> {
        if let Some(order) = self
            .live_orders
            .write()
            .iter_mut()
            .find(|order| order.order_id == order_id)
        {
            order.status = status;
        }
        Ok(())
    }

    async fn set_position_ref(
        &self,
        set: TableSet,
        order_id: &str,
        position_id: Uuid,
    ) -> Result<(), StoreError> {
        if let Some(order) = self
            .order_table(set)
            .write()
            .iter_mut()
            .find(|order| order.order_id == order_id)
        {
            order.position_ref = Some(position_id);
        }
        Ok(())
    }

    async fn replace_positions(
        &self,
        set: TableSet,
        positions: Vec<Position>,
    ) -> Result<(), StoreError> {
        *self.position_table(set).write() = positions;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{BotStatus, Side};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn orders_scan_preserves_insertion_order() {
        let store = InMemoryLedgerStore::new();
        for id in ["o-1", "o-2", "o-3"] {
            store
                .insert_order(
                    TableSet::Live,
                    Order::new(
                        "a",
                        "bitmex",
                        id,
                        Utc::now(),
                        OrderStatus::Open,
                        Side::Buy,
                        dec!(1),
                        dec!(100),
                        dec!(5),
                        dec!(10),
                    ),
                )
                .await
                .unwrap();
        }

        let ids: Vec<_> = store
            .orders(TableSet::Live)
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.order_id)
            .collect();
        assert_eq!(ids, vec!["o-1", "o-2", "o-3"]);
    }

    #[tokio::test]
    async fn insert_bot_is_an_upsert() {
        let store = InMemoryLedgerStore::new();
        let mut bot = Bot {
            bot_id: "a".to_string(),
            strategy: String::new(),
            margin: Decimal::ZERO,
            pair: vec![],
            port: 3009,
            status: BotStatus::Stop,
        };
        store.insert_bot(bot.clone()).await.unwrap();
        bot.port = 3010;
        store.insert_bot(bot).await.unwrap();

        assert_eq!(store.bot("a").await.unwrap().unwrap().port, 3010);
    }

    #[tokio::test]
    async fn update_margin_for_unknown_bot_is_a_no_op() {
        let store = InMemoryLedgerStore::new();
        store.update_bot_margin("ghost", dec!(10)).await.unwrap();
        assert!(store.bot("ghost").await.unwrap().is_none());
    }
}

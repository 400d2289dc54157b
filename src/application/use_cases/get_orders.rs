use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;

use crate::application::ledger::LedgerWriter;
use crate::application::ports::{
    LedgerStore, MessageSource, StoreError, TableSet, Topic, TransportError,
};
use crate::domain::messages::{NormalizeError, normalize_batch};
use crate::domain::services::{BotOrderBook, aggregate_orders};

#[derive(Debug, Error)]
pub enum OrdersViewError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Reconcile the order-status backlog into the store, then build the
/// per-bot open/filled view from the updated rows.
pub struct GetOrdersUseCase<S: LedgerStore, M: MessageSource> {
    store: Arc<S>,
    source: Arc<M>,
}

impl<S: LedgerStore, M: MessageSource> GetOrdersUseCase<S, M> {
    pub fn new(store: Arc<S>, source: Arc<M>) -> Self {
        Self { store, source }
    }

    pub async fn execute(&self, today: NaiveDate) -> Result<Vec<BotOrderBook>, OrdersViewError> {
        let raw = self.source.fetch(Topic::Orders).await?;
        tracing::debug!(count = raw.len(), "consumed order-status backlog");

        let batch = normalize_batch(&raw)?;
        LedgerWriter::new(Arc::clone(&self.store))
            .apply(&batch, today)
            .await?;

        let rows = self.store.orders(TableSet::Live).await?;
        Ok(aggregate_orders(&rows))
    }
}

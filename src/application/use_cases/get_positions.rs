use std::sync::Arc;

use crate::application::ports::{LedgerStore, StoreError, TableSet};
use crate::domain::entities::{Order, Position};
use crate::domain::services::{BotPositions, resolve_positions};

/// Derive long/short position views from filled orders and write the
/// resolution back to the store.
///
/// Every filled order ends up with a position reference after this runs:
/// matched legs point at the position realized by their match event, and
/// residual open exposure points at its open position.
pub struct GetPositionsUseCase<S: LedgerStore> {
    store: Arc<S>,
}

impl<S: LedgerStore> GetPositionsUseCase<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, set: TableSet) -> Result<Vec<BotPositions>, StoreError> {
        let rows = self.store.orders(set).await?;
        let filled: Vec<Order> = rows
            .into_iter()
            .filter(|order| order.status.is_filled())
            .collect();

        let resolution = resolve_positions(&filled);

        for (order_id, position_id) in &resolution.assignments {
            self.store
                .set_position_ref(set, order_id, *position_id)
                .await?;
        }

        let positions: Vec<Position> = resolution
            .books
            .iter()
            .flat_map(|book| book.long.iter().chain(book.short.iter()).cloned())
            .collect();
        self.store.replace_positions(set, positions).await?;

        Ok(resolution.books)
    }
}

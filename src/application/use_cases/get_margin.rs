use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;

use crate::application::ledger::LedgerWriter;
use crate::application::ports::{LedgerStore, MessageSource, StoreError, Topic, TransportError};
use crate::domain::messages::{NormalizeError, normalize_batch};
use crate::domain::services::{MarginView, day_key, group_by_exchange};

#[derive(Debug, Error)]
pub enum MarginViewError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One consumption pass over the margin backlog followed by the per-call
/// exchange grouping.
///
/// All aggregation state lives inside the call; concurrent requests each
/// fold their own batch.
pub struct GetMarginUseCase<S: LedgerStore, M: MessageSource> {
    store: Arc<S>,
    source: Arc<M>,
}

impl<S: LedgerStore, M: MessageSource> GetMarginUseCase<S, M> {
    pub fn new(store: Arc<S>, source: Arc<M>) -> Self {
        Self { store, source }
    }

    pub async fn execute(&self, today: NaiveDate) -> Result<MarginView, MarginViewError> {
        let raw = self.source.fetch(Topic::Margin).await?;
        tracing::debug!(count = raw.len(), "consumed margin backlog");

        let batch = normalize_batch(&raw)?;
        LedgerWriter::new(Arc::clone(&self.store))
            .apply(&batch, today)
            .await?;

        Ok(group_by_exchange(&batch, &day_key(today)))
    }
}

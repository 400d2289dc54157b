use serde::{Deserialize, Serialize};

/// Order lifecycle status as reported by the exchanges.
///
/// The status stream is at-least-once and unordered, so transitions are not
/// enforced here; the ledger writer only applies a change when the incoming
/// status differs from the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Resting on the exchange, not yet executed
    Open,
    /// Completely executed
    Filled,
    /// Canceled before completion (BitMEX spells it "Canceled")
    #[serde(alias = "Canceled")]
    Cancelled,
    /// Rejected by the exchange
    Rejected,
}

impl OrderStatus {
    /// Returns true if the order still counts as working exposure
    pub fn is_open(&self) -> bool {
        matches!(self, OrderStatus::Open)
    }

    /// Returns true if the order executed in full
    pub fn is_filled(&self) -> bool {
        matches!(self, OrderStatus::Filled)
    }
}

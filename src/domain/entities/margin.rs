use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::BotId;

/// One margin snapshot at calendar-day granularity.
///
/// The ledger writer inserts at most one record per day; later same-day
/// messages update the bot balance but never duplicate the day's record.
/// The bot attribution is optional because producers may omit the bot id
/// entirely (accepted, but the snapshot cannot be attributed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginRecord {
    pub amount: Decimal,
    pub bot_id: Option<BotId>,
    pub date: NaiveDate,
}

//! Per-exchange grouping of margin snapshots.

use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use serde::Serialize;

use crate::domain::entities::BotId;
use crate::domain::messages::{EventBody, EventMessage};

/// One margin snapshot as exposed by the margin view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarginPoint {
    #[serde(rename = "botId")]
    pub bot_id: Option<BotId>,
    pub amount: String,
    pub date: String,
}

/// Margin snapshots keyed by exchange, in first-seen exchange order
pub type MarginView = IndexMap<String, Vec<MarginPoint>>;

/// Calendar-day key in the producers' `YYYY-M-D` form (no zero padding)
pub fn day_key(date: NaiveDate) -> String {
    format!("{}-{}-{}", date.year(), date.month(), date.day())
}

/// Fold one batch of messages into a per-exchange view.
///
/// A fresh grouping is built on every call; nothing carries over between
/// calls. Non-margin messages in the batch are skipped.
pub fn group_by_exchange(batch: &[EventMessage], day: &str) -> MarginView {
    let mut view = MarginView::new();

    for message in batch {
        if let EventBody::Margin(update) = &message.body {
            let point = MarginPoint {
                bot_id: message.bot_id.clone(),
                amount: update.amount.to_string(),
                date: day.to_string(),
            };
            replace_exchange_entry(&mut view, &message.exchange, point);
        }
    }

    view
}

/// A later snapshot for an exchange replaces the exchange's whole list, so
/// only the newest message per exchange survives a call. Isolated here so a
/// change of intent (append instead of replace) is a one-line fix.
fn replace_exchange_entry(view: &mut MarginView, exchange: &str, point: MarginPoint) {
    view.insert(exchange.to_string(), vec![point]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::messages::normalize;

    fn margin(bot: &str, exchange: &str, amount: &str) -> EventMessage {
        normalize(&format!(
            r#"{{"botId":"{bot}","exchange":"{exchange}","data":{{"amount":{amount}}}}}"#
        ))
        .unwrap()
    }

    #[test]
    fn newest_message_per_exchange_wins() {
        let batch = vec![
            margin("a", "bitmex", "100"),
            margin("b", "bitmex", "250"),
        ];

        let view = group_by_exchange(&batch, "2024-1-5");

        let entries = &view["bitmex"];
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].bot_id.as_deref(), Some("b"));
        assert_eq!(entries[0].amount, "250");
        assert_eq!(entries[0].date, "2024-1-5");
    }

    #[test]
    fn exchanges_keep_first_seen_order() {
        let batch = vec![
            margin("a", "bitmex", "1"),
            margin("b", "deribit", "2"),
            margin("c", "bitmex", "3"),
        ];

        let view = group_by_exchange(&batch, "2024-1-5");

        let exchanges: Vec<_> = view.keys().cloned().collect();
        assert_eq!(exchanges, vec!["bitmex", "deribit"]);
    }

    #[test]
    fn order_messages_are_skipped() {
        let batch = vec![
            normalize(r#"{"bot_id":"a","exchange":"bitmex","data":[]}"#).unwrap(),
        ];

        assert!(group_by_exchange(&batch, "2024-1-5").is_empty());
    }

    #[test]
    fn day_key_has_no_zero_padding() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(day_key(date), "2024-3-7");
    }
}

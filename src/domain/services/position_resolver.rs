//! Side-aware FIFO pairing of filled orders into positions.
//!
//! Exposure is tracked per bot and per exchange as a FIFO queue of open
//! lots. A fill on the opposite side of the queue consumes the oldest lot
//! first; each match event realizes P&L for the matched size and emits one
//! closed position. Size-weighted FIFO consumption makes the realized P&L
//! equivalent to a moving-average cost basis, and callers depend on that
//! exact arithmetic for reproducible numbers.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::{BotId, Order, Position, PositionSide, Side};

/// One bot's positions split by the side that opened them
#[derive(Debug, Clone, Serialize)]
pub struct BotPositions {
    pub bot_id: BotId,
    pub long: Vec<Position>,
    pub short: Vec<Position>,
}

/// Resolver output: the per-bot views plus the order -> position
/// assignments that keep the "every filled order has a position_ref"
/// invariant.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub books: Vec<BotPositions>,
    pub assignments: Vec<(String, Uuid)>,
}

/// Entry-side exposure waiting for an opposing fill
struct OpenLot {
    entry_order_id: String,
    side: Side,
    remaining: Decimal,
    entry_price: Decimal,
    init_margin: Decimal,
    leverage: Decimal,
    average_price: Decimal,
    start_time: DateTime<Utc>,
    lot_id: Uuid,
}

/// Pair filled orders into positions, grouped per bot in first-seen order.
///
/// Orders are matched per (bot, exchange) in chronological order; identical
/// timestamps keep their original fetch order (stable sort). Residual open
/// lots are emitted as open positions so their entry legs still receive a
/// position reference.
pub fn resolve_positions(filled: &[Order]) -> Resolution {
    let mut groups: Vec<(BotId, String, Vec<&Order>)> = Vec::new();
    for order in filled {
        match groups
            .iter_mut()
            .find(|(bot, exchange, _)| *bot == order.bot_id && *exchange == order.exchange)
        {
            Some((_, _, bucket)) => bucket.push(order),
            None => groups.push((order.bot_id.clone(), order.exchange.clone(), vec![order])),
        }
    }

    let mut books: Vec<BotPositions> = Vec::new();
    let mut assignments: Vec<(String, Uuid)> = Vec::new();

    for (bot_id, _exchange, mut bucket) in groups {
        bucket.sort_by_key(|order| order.timestamp);
        let (long, short) = resolve_group(&bot_id, &bucket, &mut assignments);

        // A bot trading on several exchanges contributes one merged book
        match books.iter_mut().find(|book| book.bot_id == bot_id) {
            Some(book) => {
                book.long.extend(long);
                book.short.extend(short);
            }
            None => books.push(BotPositions {
                bot_id,
                long,
                short,
            }),
        }
    }

    Resolution { books, assignments }
}

fn resolve_group(
    bot_id: &BotId,
    orders: &[&Order],
    assignments: &mut Vec<(String, Uuid)>,
) -> (Vec<Position>, Vec<Position>) {
    let mut queue: VecDeque<OpenLot> = VecDeque::new();
    let mut long: Vec<Position> = Vec::new();
    let mut short: Vec<Position> = Vec::new();

    for order in orders {
        let mut remaining = order.size;

        while remaining > Decimal::ZERO {
            let Some(front) = queue.front_mut() else {
                break;
            };
            if front.side == order.side {
                break;
            }

            let matched = remaining.min(front.remaining);
            let position = close_lot(bot_id, front, order, matched);
            assignments.push((front.entry_order_id.clone(), position.position_id));
            assignments.push((order.order_id.clone(), position.position_id));
            bucket_for(front.side, &mut long, &mut short).push(position);

            front.remaining -= matched;
            remaining -= matched;
            if front.remaining.is_zero() {
                queue.pop_front();
            }
        }

        if remaining > Decimal::ZERO {
            queue.push_back(OpenLot {
                entry_order_id: order.order_id.clone(),
                side: order.side,
                remaining,
                entry_price: order.price,
                init_margin: order.margin,
                leverage: order.leverage,
                average_price: order.average_price,
                start_time: order.timestamp,
                lot_id: Uuid::new_v4(),
            });
        }
    }

    // Residual exposure surfaces as open positions; the entry legs pick up
    // the lot's id as their position reference.
    for lot in queue {
        assignments.push((lot.entry_order_id.clone(), lot.lot_id));
        let position = Position {
            position_id: lot.lot_id,
            bot_id: bot_id.clone(),
            entry_price: lot.entry_price,
            init_margin: lot.init_margin,
            start_time: lot.start_time,
            end_time: None,
            side: position_side(lot.side),
            size: lot.remaining,
            profit_loss: Decimal::ZERO,
            roe: Decimal::ZERO,
            leverage: lot.leverage,
            average_price: lot.average_price,
        };
        bucket_for(lot.side, &mut long, &mut short).push(position);
    }

    (long, short)
}

/// Realize one match event against a queued lot
fn close_lot(bot_id: &BotId, lot: &OpenLot, exit: &Order, matched: Decimal) -> Position {
    let profit_loss = match lot.side {
        Side::Buy => (exit.price - lot.entry_price) * matched,
        Side::Sell => (lot.entry_price - exit.price) * matched,
    };
    let roe = if lot.init_margin.is_zero() {
        Decimal::ZERO
    } else {
        profit_loss / lot.init_margin
    };

    Position {
        position_id: Uuid::new_v4(),
        bot_id: bot_id.clone(),
        entry_price: lot.entry_price,
        init_margin: lot.init_margin,
        start_time: lot.start_time,
        end_time: Some(exit.timestamp),
        side: position_side(lot.side),
        size: matched,
        profit_loss,
        roe,
        leverage: lot.leverage,
        average_price: lot.average_price,
    }
}

fn position_side(entry: Side) -> PositionSide {
    match entry {
        Side::Buy => PositionSide::Long,
        Side::Sell => PositionSide::Short,
    }
}

fn bucket_for<'a>(
    entry: Side,
    long: &'a mut Vec<Position>,
    short: &'a mut Vec<Position>,
) -> &'a mut Vec<Position> {
    match entry {
        Side::Buy => long,
        Side::Sell => short,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::OrderStatus;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn fill(
        bot: &str,
        exchange: &str,
        id: &str,
        seconds: i64,
        side: Side,
        size: Decimal,
        price: Decimal,
        margin: Decimal,
    ) -> Order {
        let mut order = Order::new(
            bot,
            exchange,
            id,
            Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap(),
            OrderStatus::Filled,
            side,
            size,
            price,
            margin,
            dec!(10),
        );
        order.average_price = price;
        order
    }

    #[test]
    fn full_close_realizes_pnl_and_roe() {
        let orders = vec![
            fill("a", "bitmex", "entry", 0, Side::Buy, dec!(10), dec!(100), dec!(50)),
            fill("a", "bitmex", "exit", 1, Side::Sell, dec!(10), dec!(110), dec!(50)),
        ];

        let resolution = resolve_positions(&orders);

        assert_eq!(resolution.books.len(), 1);
        let book = &resolution.books[0];
        assert_eq!(book.bot_id, "a");
        assert_eq!(book.long.len(), 1);
        assert!(book.short.is_empty());

        let position = &book.long[0];
        assert_eq!(position.profit_loss, dec!(100));
        assert_eq!(position.roe, dec!(2));
        assert_eq!(position.size, dec!(10));
        assert_eq!(position.entry_price, dec!(100));
        assert!(position.end_time.is_some());

        // both legs reference the same position
        let refs: Vec<_> = resolution
            .assignments
            .iter()
            .filter(|(_, id)| *id == position.position_id)
            .map(|(order_id, _)| order_id.as_str())
            .collect();
        assert_eq!(refs, vec!["entry", "exit"]);
    }

    #[test]
    fn partial_exits_emit_one_position_per_exit_event() {
        let orders = vec![
            fill("a", "bitmex", "entry", 0, Side::Buy, dec!(10), dec!(100), dec!(50)),
            fill("a", "bitmex", "exit-1", 1, Side::Sell, dec!(6), dec!(110), dec!(30)),
            fill("a", "bitmex", "exit-2", 2, Side::Sell, dec!(4), dec!(120), dec!(20)),
        ];

        let resolution = resolve_positions(&orders);
        let book = &resolution.books[0];

        assert_eq!(book.long.len(), 2);
        assert!(book.short.is_empty());
        assert_eq!(book.long[0].size, dec!(6));
        assert_eq!(book.long[0].profit_loss, dec!(60));
        assert_eq!(book.long[1].size, dec!(4));
        assert_eq!(book.long[1].profit_loss, dec!(80));

        // exposure fully closed, no residual open position
        assert!(book.long.iter().all(|p| p.end_time.is_some()));
    }

    #[test]
    fn one_exit_consumes_queued_lots_fifo() {
        let orders = vec![
            fill("a", "bitmex", "entry-1", 0, Side::Buy, dec!(5), dec!(100), dec!(25)),
            fill("a", "bitmex", "entry-2", 1, Side::Buy, dec!(5), dec!(102), dec!(25)),
            fill("a", "bitmex", "exit", 2, Side::Sell, dec!(8), dec!(110), dec!(40)),
        ];

        let resolution = resolve_positions(&orders);
        let book = &resolution.books[0];

        // 5 from the first lot, 3 from the second, 2 still open
        assert_eq!(book.long.len(), 3);
        assert_eq!(book.long[0].size, dec!(5));
        assert_eq!(book.long[0].profit_loss, dec!(50));
        assert_eq!(book.long[1].size, dec!(3));
        assert_eq!(book.long[1].profit_loss, dec!(24));
        assert_eq!(book.long[2].size, dec!(2));
        assert!(book.long[2].is_open());
        assert_eq!(book.long[2].entry_price, dec!(102));
    }

    #[test]
    fn short_entry_closed_by_buy_lands_in_short() {
        let orders = vec![
            fill("a", "bitmex", "entry", 0, Side::Sell, dec!(10), dec!(110), dec!(55)),
            fill("a", "bitmex", "exit", 1, Side::Buy, dec!(10), dec!(100), dec!(55)),
        ];

        let resolution = resolve_positions(&orders);
        let book = &resolution.books[0];

        assert!(book.long.is_empty());
        assert_eq!(book.short.len(), 1);
        assert_eq!(book.short[0].profit_loss, dec!(100));
        assert_eq!(book.short[0].side, PositionSide::Short);
    }

    #[test]
    fn open_exposure_gets_a_position_ref() {
        let orders = vec![fill(
            "a", "bitmex", "entry", 0, Side::Buy, dec!(10), dec!(100), dec!(50),
        )];

        let resolution = resolve_positions(&orders);
        let book = &resolution.books[0];

        assert_eq!(book.long.len(), 1);
        assert!(book.long[0].is_open());
        assert_eq!(book.long[0].profit_loss, Decimal::ZERO);
        assert_eq!(
            resolution.assignments,
            vec![("entry".to_string(), book.long[0].position_id)]
        );
    }

    #[test]
    fn exchanges_are_matched_independently() {
        let orders = vec![
            fill("a", "bitmex", "entry", 0, Side::Buy, dec!(10), dec!(100), dec!(50)),
            fill("a", "deribit", "exit", 1, Side::Sell, dec!(10), dec!(110), dec!(50)),
        ];

        let resolution = resolve_positions(&orders);
        let book = &resolution.books[0];

        // no cross-exchange match: one open long, one open short
        assert_eq!(book.long.len(), 1);
        assert_eq!(book.short.len(), 1);
        assert!(book.long[0].is_open());
        assert!(book.short[0].is_open());
    }

    #[test]
    fn bots_keep_first_seen_order() {
        let orders = vec![
            fill("b", "bitmex", "o-1", 0, Side::Buy, dec!(1), dec!(100), dec!(5)),
            fill("a", "bitmex", "o-2", 0, Side::Buy, dec!(1), dec!(100), dec!(5)),
        ];

        let resolution = resolve_positions(&orders);
        assert_eq!(resolution.books[0].bot_id, "b");
        assert_eq!(resolution.books[1].bot_id, "a");
    }

    #[test]
    fn zero_margin_entry_yields_zero_roe() {
        let orders = vec![
            fill("a", "bitmex", "entry", 0, Side::Buy, dec!(10), dec!(100), dec!(0)),
            fill("a", "bitmex", "exit", 1, Side::Sell, dec!(10), dec!(110), dec!(0)),
        ];

        let resolution = resolve_positions(&orders);
        assert_eq!(resolution.books[0].long[0].roe, Decimal::ZERO);
    }
}

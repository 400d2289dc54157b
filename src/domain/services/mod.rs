mod margin_view;
mod order_book;
mod position_resolver;

pub use margin_view::{MarginPoint, MarginView, day_key, group_by_exchange};
pub use order_book::{BotOrderBook, aggregate_orders};
pub use position_resolver::{BotPositions, Resolution, resolve_positions};

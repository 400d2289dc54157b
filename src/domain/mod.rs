pub mod entities;
pub mod messages;
pub mod services;

// Re-export entity types
pub use entities::{
    Bot, BotCredentials, BotId, BotStatus, MarginRecord, Order, OrderStatus, Position,
    PositionSide, Side,
};

// Re-export the inbound message model
pub use messages::{
    EventBody, EventMessage, MarginUpdate, NormalizeError, OrderStatusUpdate, normalize,
    normalize_batch,
};

// Re-export reconciliation services
pub use services::{
    BotOrderBook, BotPositions, MarginPoint, MarginView, Resolution, aggregate_orders, day_key,
    group_by_exchange, resolve_positions,
};

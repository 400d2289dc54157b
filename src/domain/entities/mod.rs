mod bot;
mod margin;
mod order;
mod order_status;
mod position;
mod side;

pub use bot::{Bot, BotCredentials, BotId, BotStatus};
pub use margin::MarginRecord;
pub use order::Order;
pub use order_status::OrderStatus;
pub use position::{Position, PositionSide};
pub use side::Side;

mod get_margin;
mod get_orders;
mod get_positions;
mod initialize_bot;
mod upload_bot;

pub use get_margin::{GetMarginUseCase, MarginViewError};
pub use get_orders::{GetOrdersUseCase, OrdersViewError};
pub use get_positions::GetPositionsUseCase;
pub use initialize_bot::{
    InitializeBotCommand, InitializeBotUseCase, InitializeError, LaunchConfig,
};
pub use upload_bot::{UploadBotCommand, UploadBotUseCase, UploadError};

pub mod ledger;
pub mod ports;
pub mod use_cases;

pub use ledger::LedgerWriter;
pub use ports::{
    ContainerRuntime, ContainerSpec, LedgerStore, MessageSource, RuntimeError, StoreError,
    TableSet, Topic, TransportError,
};
pub use use_cases::{
    GetMarginUseCase, GetOrdersUseCase, GetPositionsUseCase, InitializeBotCommand,
    InitializeBotUseCase, InitializeError, LaunchConfig, MarginViewError, OrdersViewError,
    UploadBotCommand, UploadBotUseCase, UploadError,
};

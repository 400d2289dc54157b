mod dto;
mod error;
mod handlers;
mod router;

pub use dto::*;
pub use error::{ApiError, ApiErrorKind, ErrorResponse};
pub use router::{AppState, create_router};

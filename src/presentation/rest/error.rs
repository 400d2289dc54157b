use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::application::use_cases::{
    InitializeError, MarginViewError, OrdersViewError, UploadError,
};
use crate::application::{StoreError, TransportError};

/// Non-standard application error code used for every boundary failure
pub const APPLICATION_ERROR: u16 = 550;

/// Error taxonomy at the HTTP boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Malformed or missing required field
    Validation,
    /// Store unreachable or constraint violation
    Persistence,
    /// Message source unreachable
    Transport,
    /// Anything else (file system, serialization, ...)
    Internal,
}

impl ApiErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiErrorKind::Validation => "validation",
            ApiErrorKind::Persistence => "persistence",
            ApiErrorKind::Transport => "transport",
            ApiErrorKind::Internal => "internal",
        }
    }
}

/// API error type: uniformly formatted, never crashes the process
#[derive(Debug)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError {
            kind: ApiErrorKind::Validation,
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        ApiError {
            kind: ApiErrorKind::Persistence,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        ApiError {
            kind: ApiErrorKind::Transport,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError {
            kind: ApiErrorKind::Internal,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub kind: &'static str,
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(APPLICATION_ERROR).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(ErrorResponse {
            status: APPLICATION_ERROR,
            kind: self.kind.as_str(),
            error: self.message,
        });
        (status, body).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {}", self.kind.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::persistence(err.to_string())
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::transport(err.to_string())
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Validation(_) => ApiError::validation(err.to_string()),
            UploadError::Store(_) => ApiError::persistence(err.to_string()),
            UploadError::StrategyFile(_) => ApiError::internal(err.to_string()),
        }
    }
}

impl From<InitializeError> for ApiError {
    fn from(err: InitializeError) -> Self {
        match err {
            InitializeError::Validation(_) | InitializeError::UnknownBot(_) => {
                ApiError::validation(err.to_string())
            }
            InitializeError::Store(_) => ApiError::persistence(err.to_string()),
        }
    }
}

impl From<MarginViewError> for ApiError {
    fn from(err: MarginViewError) -> Self {
        match err {
            MarginViewError::Transport(_) => ApiError::transport(err.to_string()),
            MarginViewError::Normalize(_) => ApiError::validation(err.to_string()),
            MarginViewError::Store(_) => ApiError::persistence(err.to_string()),
        }
    }
}

impl From<OrdersViewError> for ApiError {
    fn from(err: OrdersViewError) -> Self {
        match err {
            OrdersViewError::Transport(_) => ApiError::transport(err.to_string()),
            OrdersViewError::Normalize(_) => ApiError::validation(err.to_string()),
            OrdersViewError::Store(_) => ApiError::persistence(err.to_string()),
        }
    }
}

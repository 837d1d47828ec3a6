use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use ledger_gateway_core::CoreError;

// ==============================================================================
// Error Type
// ==============================================================================

/// Terminal request outcome. Bodies are short plain-text reasons naming the
/// offending identifier.
#[derive(Debug)]
pub(crate) enum AppError {
    BadRequest(String),
    NotFound(String),
    Unavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Unavailable(msg) => {
                warn!(error = %msg, "collaborator unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, msg)
            }
        };

        (status, message).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::BlockNotFound(_) | CoreError::TxNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            CoreError::InvalidTxHash(_)
            | CoreError::InvalidAddress(_)
            | CoreError::InvalidTxData(_) => AppError::BadRequest(err.to_string()),
            CoreError::Unavailable(_) => AppError::Unavailable(err.to_string()),
        }
    }
}

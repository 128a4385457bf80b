//! Authentication Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::api::{error_response, INTERNAL_ERROR_MESSAGE};
use crate::kv::KvError;

/// Authentication error types.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Login body could not be parsed or has no usable username.
    #[error("Wrong login request format")]
    MalformedRequest,

    /// Session id unknown, expired, or mapped to an empty username.
    #[error("Unauthorized")]
    Unauthorized,

    /// Session store failure.
    #[error("Internal server error")]
    Store(#[from] KvError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MalformedRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Store(e) => {
                error!(error = %e, "Session store failed");
                return error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE);
            }
        };

        error_response(status, &self.to_string())
    }
}

/// Result type for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

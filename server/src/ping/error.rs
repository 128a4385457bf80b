//! Ping Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::error_response;
use crate::auth::AuthError;
use crate::ratelimit::RateLimitError;

/// Ways a ping request can end without running.
#[derive(Debug, Error)]
pub enum PingError {
    /// Body could not be parsed or lacks `sessionId`.
    #[error("Wrong ping request format")]
    MalformedRequest,

    /// Session resolution failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Gate or window refused, or the store failed during admission.
    #[error(transparent)]
    RateLimit(#[from] RateLimitError),
}

impl IntoResponse for PingError {
    fn into_response(self) -> Response {
        match self {
            Self::MalformedRequest => {
                error_response(StatusCode::BAD_REQUEST, "Wrong ping request format")
            }
            Self::Auth(e) => e.into_response(),
            Self::RateLimit(e) => e.into_response(),
        }
    }
}

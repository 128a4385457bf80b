//! Rate limiting error types for HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::api::{error_response, INTERNAL_ERROR_MESSAGE};
use crate::kv::KvError;
use crate::ratelimit::TOO_MANY_REQUESTS_MESSAGE;

/// Errors that can occur during admission checks.
#[derive(Debug, Error)]
pub enum RateLimitError {
    /// The global gate has no free slot.
    #[error("Gate full ({in_flight} of {capacity} in flight)")]
    GateFull { in_flight: i64, capacity: u32 },

    /// The user's window is exhausted.
    #[error("Rate limit exceeded ({count} of {limit} in window)")]
    LimitExceeded { count: i64, limit: u32 },

    /// The shared store failed.
    #[error("Store unavailable")]
    Store(#[from] KvError),
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        match self {
            // Gate and window refusals look the same to the client.
            Self::GateFull { .. } | Self::LimitExceeded { .. } => {
                error_response(StatusCode::TOO_MANY_REQUESTS, TOO_MANY_REQUESTS_MESSAGE)
            }
            Self::Store(e) => {
                error!(error = %e, "Admission check failed on store error");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}

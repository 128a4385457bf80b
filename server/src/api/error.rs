//! Shared JSON error body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::MessageResponse;

/// Message returned for every store failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Builds a `{ "message": ... }` response with the given status.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(MessageResponse {
            message: message.to_string(),
        }),
    )
        .into_response()
}

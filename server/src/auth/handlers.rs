//! Authentication Handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::AppState;

use super::error::{AuthError, AuthResult};

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
}

/// Login response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub session_id: String,
}

/// Issue a session for a username.
///
/// POST /login
///
/// There is no credential check yet; any non-empty username gets a session.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<Json<LoginResponse>> {
    let Json(body) = payload.map_err(|rejection| {
        debug!(error = %rejection, "Rejected login body");
        AuthError::MalformedRequest
    })?;

    if body.username.is_empty() {
        return Err(AuthError::MalformedRequest);
    }

    let session_id = state.sessions.issue(&body.username).await?;
    Ok(Json(LoginResponse { session_id }))
}

//! Ping Service
//!
//! The authenticated, admission-controlled ping endpoint.

mod controller;
mod error;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::debug;

use crate::api::AppState;

pub use controller::PingController;
pub use error::PingError;

/// Create ping router.
///
/// - GET /ping - Run the slow ping under gate and per-user window
pub fn router() -> Router<AppState> {
    Router::new().route("/ping", get(ping))
}

/// Ping request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingRequest {
    pub session_id: String,
}

/// GET /ping
async fn ping(
    State(state): State<AppState>,
    payload: Result<Json<PingRequest>, JsonRejection>,
) -> Result<StatusCode, PingError> {
    let Json(body) = payload.map_err(|rejection| {
        debug!(error = %rejection, "Rejected ping body");
        PingError::MalformedRequest
    })?;

    state.ping.admit(&body.session_id).await?;
    Ok(StatusCode::OK)
}

//! API Router and Application State
//!
//! Central routing configuration and shared state.

mod error;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    auth::{self, SessionStore},
    config::Config,
    kv::SharedKv,
    ping::{self, PingController},
    ratelimit::{ConcurrencyGate, GateMode, RateLimitConfig, UserRateLimiter},
};

pub use error::{error_response, INTERNAL_ERROR_MESSAGE};

/// Shared application state.
///
/// The store handle is created once at startup and every component that
/// talks to it is built in [`AppState::new`], so tests can hand in a `MemoryStore`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<Config>,
    /// Admission control configuration
    pub rate_limit: Arc<RateLimitConfig>,
    /// Login sessions
    pub sessions: SessionStore,
    /// Admission controller for /ping
    pub ping: PingController,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(kv: SharedKv, config: Config, rate_limit: RateLimitConfig) -> Self {
        let sessions = SessionStore::new(kv.clone(), config.session_ttl());
        let gate = ConcurrencyGate::new(kv.clone(), rate_limit.gate.clone());
        let limiter = UserRateLimiter::new(kv, rate_limit.user_limit.clone());
        let ping = PingController::new(sessions.clone(), gate, limiter, config.ping_work());

        Self {
            config: Arc::new(config),
            rate_limit: Arc::new(rate_limit),
            sessions,
            ping,
        }
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let request_timeout = state.config.request_timeout();

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Placeholder counter, no admission control
        .route("/count", get(count))
        .merge(auth::router())
        .merge(ping::router())
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        // State
        .with_state(state)
}

/// `{ "message": ... }` body used by /count and by every error response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET /count
async fn count() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "pong".to_string(),
    })
}

/// Health check response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    /// Service status
    status: &'static str,
    /// How the ping gate claims slots
    gate_mode: GateMode,
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        gate_mode: state.rate_limit.gate.mode,
    })
}

//! Authentication Service
//!
//! Opaque login sessions stored in the shared KV store.

mod error;
mod handlers;
pub mod session;

use axum::{routing::post, Router};

use crate::api::AppState;

pub use error::{AuthError, AuthResult};
pub use handlers::{LoginRequest, LoginResponse};
pub use session::SessionStore;

/// Create authentication router.
///
/// - POST /login - Issue a session for a username
pub fn router() -> Router<AppState> {
    Router::new().route("/login", post(handlers::login))
}

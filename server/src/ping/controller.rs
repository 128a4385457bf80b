//! Ping admission controller.
//!
//! Request path: resolve session, claim a gate slot, record an admission in
//! the user's window, run the work, give the gate slot back. The gate slot is
//! returned on every exit after it was claimed; the window admission is not.

use std::time::Duration;

use tracing::{debug, info};

use crate::auth::SessionStore;
use crate::ratelimit::{ConcurrencyGate, RateLimitError, UserRateLimiter};

use super::error::PingError;

/// Orchestrates authentication, admission and the work behind /ping.
#[derive(Clone)]
pub struct PingController {
    sessions: SessionStore,
    gate: ConcurrencyGate,
    limiter: UserRateLimiter,
    work: Duration,
}

impl PingController {
    pub const fn new(
        sessions: SessionStore,
        gate: ConcurrencyGate,
        limiter: UserRateLimiter,
        work: Duration,
    ) -> Self {
        Self {
            sessions,
            gate,
            limiter,
            work,
        }
    }

    /// Admits the request and runs the work, or says why it was refused.
    ///
    /// A refusal by the gate leaves the user's window untouched. Once the
    /// gate slot is held it is released on every path, including
    /// cancellation of this future.
    #[tracing::instrument(skip_all)]
    pub async fn admit(&self, session_id: &str) -> Result<(), PingError> {
        let username = self.sessions.resolve(session_id).await?;

        let permit = self.gate.acquire().await.inspect_err(|e| {
            debug!(username = %username, reason = %e, "Ping refused at gate");
        })?;

        let outcome = self.run_admitted(&username).await;
        permit.release().await;

        if outcome.is_ok() {
            info!(username = %username, "Ping completed");
        }
        outcome
    }

    /// Steps that run while the gate slot is held.
    async fn run_admitted(&self, username: &str) -> Result<(), PingError> {
        let result = self.limiter.check(username).await?;
        if !result.allowed {
            debug!(username = %username, count = result.count, "Ping refused by user window");
            return Err(RateLimitError::LimitExceeded {
                count: result.count,
                limit: result.limit,
            }
            .into());
        }

        debug!(
            username = %username,
            count = result.count,
            remaining = result.remaining,
            "Ping admitted"
        );
        tokio::time::sleep(self.work).await;
        Ok(())
    }
}

//! Per-user fixed-window rate limiter backed by the shared store.

use tracing::debug;

use crate::kv::SharedKv;
use crate::ratelimit::{LimitConfig, RateLimitError, RateLimitResult, USER_WINDOW_KEY_PREFIX};

/// Counts admissions per user in a fixed window that starts at the first
/// admission and ends when the counter's TTL runs out.
///
/// Admissions are never handed back; the window only decays through TTL.
#[derive(Clone)]
pub struct UserRateLimiter {
    kv: SharedKv,
    limit: LimitConfig,
}

impl UserRateLimiter {
    pub const fn new(kv: SharedKv, limit: LimitConfig) -> Self {
        Self { kv, limit }
    }

    /// Checks the user's window and records an admission if there is room.
    ///
    /// Returns `allowed: false` without touching the counter when the window
    /// is full.
    ///
    /// # Errors
    /// `RateLimitError::Store` if the shared store fails.
    #[tracing::instrument(skip(self), fields(limit = self.limit.requests, window_secs = self.limit.window_secs))]
    pub async fn check(&self, username: &str) -> Result<RateLimitResult, RateLimitError> {
        let key = Self::build_key(username);
        let window = self.limit.window();
        let limit = i64::from(self.limit.requests);

        let current = match self.kv.get_int(&key).await? {
            Some(value) => value,
            None => {
                self.kv.set(&key, "0", Some(window)).await?;
                0
            }
        };

        if current >= limit {
            debug!(count = current, "Window full");
            return Ok(RateLimitResult {
                allowed: false,
                limit: self.limit.requests,
                count: current,
                remaining: 0,
            });
        }

        let count = self.kv.incr(&key).await?;
        if count == 1 {
            // The counter may have expired after the read, and INCR recreates
            // it without TTL.
            self.kv.expire(&key, window).await?;
        }

        debug!(count, "Admission recorded");
        Ok(RateLimitResult {
            allowed: true,
            limit: self.limit.requests,
            count,
            remaining: (limit - count).max(0) as u32,
        })
    }

    /// Builds the window counter key for a user.
    pub fn build_key(username: &str) -> String {
        format!("{USER_WINDOW_KEY_PREFIX}:{username}")
    }
}

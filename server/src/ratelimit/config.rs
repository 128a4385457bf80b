//! Rate limiting configuration.

use std::time::Duration;

use anyhow::{bail, ensure, Context, Result};

use crate::ratelimit::GateMode;

/// Configuration for admission control on /ping.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Global in-flight gate
    pub gate: GateConfig,
    /// Per-user fixed window
    pub user_limit: LimitConfig,
}

/// Configuration for the global concurrency gate.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Maximum requests in flight across all instances
    pub capacity: u32,
    /// How a slot is claimed in the shared counter
    pub mode: GateMode,
}

/// Configuration for a single rate limit.
#[derive(Debug, Clone)]
pub struct LimitConfig {
    /// Maximum requests allowed in the window
    pub requests: u32,
    /// Window duration in seconds
    pub window_secs: u64,
}

impl LimitConfig {
    pub const fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            gate: GateConfig {
                capacity: 1,
                mode: GateMode::Atomic,
            },
            user_limit: LimitConfig {
                requests: 2,
                window_secs: 60,
            },
        }
    }
}

impl RateLimitConfig {
    /// Creates configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PING_GATE_CAPACITY`: Max concurrent /ping requests (default: 1)
    /// - `PING_GATE_MODE`: `atomic` or `check_then_incr` (default: atomic)
    /// - `PING_USER_LIMIT`: Per-user limit as "requests,window_secs" (default: 2,60)
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("PING_GATE_CAPACITY") {
            if let Ok(capacity) = val.trim().parse() {
                config.gate.capacity = capacity;
            }
        }
        if let Ok(val) = std::env::var("PING_GATE_MODE") {
            config.gate.mode = val
                .parse()
                .with_context(|| format!("Invalid PING_GATE_MODE: {val}"))?;
        }
        if let Ok(val) = std::env::var("PING_USER_LIMIT") {
            match parse_limit_config(&val) {
                Some(limit) => config.user_limit = limit,
                None => bail!("Invalid PING_USER_LIMIT: {val} (expected \"requests,window_secs\")"),
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Rejects limits that would refuse every request or never expire.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.gate.capacity > 0, "Gate capacity must be positive");
        ensure!(
            self.user_limit.requests > 0,
            "Per-user request limit must be positive"
        );
        ensure!(
            self.user_limit.window_secs > 0,
            "Per-user window must be positive"
        );
        Ok(())
    }
}

/// Parses a limit config from "requests,window_secs" format.
fn parse_limit_config(val: &str) -> Option<LimitConfig> {
    let parts: Vec<&str> = val.split(',').collect();
    if parts.len() == 2 {
        let requests = parts[0].trim().parse().ok()?;
        let window_secs = parts[1].trim().parse().ok()?;
        Some(LimitConfig {
            requests,
            window_secs,
        })
    } else {
        None
    }
}

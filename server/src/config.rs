//! Server Configuration
//!
//! Loads configuration from environment variables.

use std::env;
use std::time::Duration;

use anyhow::{ensure, Result};

/// URL scheme selecting the in-process store instead of Redis.
pub const MEMORY_STORE_URL: &str = "memory://";

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080")
    pub bind_address: String,

    /// Redis connection URL, or `memory://` for the in-process store
    pub redis_url: String,

    /// Login session lifetime in seconds (default: 86400 = 24 h)
    pub session_ttl_secs: u64,

    /// Duration of the simulated work behind /ping in seconds (default: 5)
    pub ping_work_secs: u64,

    /// Deadline for a whole request in seconds (default: 30)
    pub request_timeout_secs: u64,

    /// Deadline for a single KV command in milliseconds (default: 2000)
    pub kv_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let config = Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".into()),
            session_ttl_secs: parse_env("SESSION_TTL_SECS").unwrap_or(86400),
            ping_work_secs: parse_env("PING_WORK_SECS").unwrap_or(5),
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS").unwrap_or(30),
            kv_timeout_ms: parse_env("KV_TIMEOUT_MS").unwrap_or(2000),
        };

        ensure!(config.session_ttl_secs > 0, "SESSION_TTL_SECS must be positive");
        ensure!(config.kv_timeout_ms > 0, "KV_TIMEOUT_MS must be positive");
        ensure!(
            config.request_timeout_secs > config.ping_work_secs,
            "REQUEST_TIMEOUT_SECS must exceed PING_WORK_SECS"
        );
        Ok(config)
    }

    /// Whether the in-process store was requested instead of Redis.
    #[must_use]
    pub fn uses_memory_store(&self) -> bool {
        self.redis_url.starts_with(MEMORY_STORE_URL)
    }

    #[must_use]
    pub const fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    #[must_use]
    pub const fn ping_work(&self) -> Duration {
        Duration::from_secs(self.ping_work_secs)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub const fn kv_timeout(&self) -> Duration {
        Duration::from_millis(self.kv_timeout_ms)
    }

    /// Create a default configuration for testing.
    ///
    /// Uses the in-process store; Redis-backed tests override `redis_url`
    /// with a local instance: `docker run -d -p 6379:6379 redis:7`.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".into(),
            redis_url: MEMORY_STORE_URL.into(),
            session_ttl_secs: 86400,
            ping_work_secs: 5,
            request_timeout_secs: 30,
            kv_timeout_ms: 2000,
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

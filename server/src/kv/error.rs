//! KV Gateway Error Types

use std::time::Duration;

use thiserror::Error;

/// Errors raised by a [`KvStore`](super::KvStore) backend.
#[derive(Debug, Error)]
pub enum KvError {
    /// Transport or protocol failure talking to Redis.
    #[error("Redis error: {0}")]
    Redis(#[from] fred::error::Error),

    /// The key holds something other than an integer.
    #[error("Value at key {key} is not an integer")]
    NotInteger { key: String },

    /// Incrementing or decrementing would overflow a 64-bit integer.
    #[error("Increment or decrement of key {key} would overflow")]
    Overflow { key: String },

    /// The command did not complete within the configured deadline.
    #[error("KV command timed out after {0:?}")]
    Timeout(Duration),
}

/// Result type for KV operations.
pub type KvResult<T> = Result<T, KvError>;

//! Key-Value Gateway
//!
//! The minimal surface the admission core needs from the shared store:
//! integer reads, plain writes with optional TTL, and atomic counters.
//! Everything above this module depends only on [`KvStore`], so the Redis
//! backend can be swapped for [`MemoryStore`] in tests.

mod error;
pub mod memory;
pub mod redis;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

pub use error::{KvError, KvResult};
pub use memory::MemoryStore;
pub use redis::{create_redis_client, RedisStore};

/// Shared handle to the store, injected through `AppState`.
pub type SharedKv = Arc<dyn KvStore>;

/// Operations the service performs against the shared key-value store.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Reads a string value. `None` when the key does not exist.
    async fn get(&self, key: &str) -> KvResult<Option<String>>;

    /// Reads an integer value. `None` when the key does not exist.
    ///
    /// Contents that do not parse as an integer are an error, not a miss.
    async fn get_int(&self, key: &str) -> KvResult<Option<i64>> {
        match self.get(key).await? {
            Some(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| KvError::NotInteger {
                    key: key.to_string(),
                }),
            None => Ok(None),
        }
    }

    /// Unconditional write. A `None` or zero TTL stores the key without expiry.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> KvResult<()>;

    /// Atomic increment. A missing key counts as 0 and is created without TTL.
    async fn incr(&self, key: &str) -> KvResult<i64>;

    /// Atomic decrement. May go negative.
    async fn decr(&self, key: &str) -> KvResult<i64>;

    /// Sets a TTL on an existing key. Returns `false` if the key is missing.
    async fn expire(&self, key: &str, ttl: Duration) -> KvResult<bool>;
}

/// Normalizes a TTL argument: zero means "no expiry".
pub(crate) fn effective_ttl(ttl: Option<Duration>) -> Option<Duration> {
    ttl.filter(|d| !d.is_zero())
}

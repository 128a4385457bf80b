//! In-process backend for the KV gateway.
//!
//! Mirrors the Redis semantics the service relies on (lazy expiry, INCR on a
//! missing key starting from 0 without TTL) on top of a `DashMap`. Expiry
//! uses the tokio clock, so tests can drive windows with paused time.
//!
//! Only coordinates requests inside one process. Expired entries are swept
//! on write at most once per [`SWEEP_INTERVAL`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::Instant;
use tracing::debug;

use super::{effective_ttl, KvError, KvResult, KvStore};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

/// Minimum time between two sweeps of expired entries.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(30);

/// Schedules sweeps relative to the store's creation time.
#[derive(Debug)]
struct SweepClock {
    origin: Instant,
    next_ms: AtomicU64,
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// [`KvStore`] held in process memory.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, Entry>>,
    sweep: Arc<SweepClock>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            entries: Arc::default(),
            sweep: Arc::new(SweepClock {
                origin: Instant::now(),
                next_ms: AtomicU64::new(millis(SWEEP_INTERVAL)),
            }),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every expired entry if the sweep interval has elapsed.
    ///
    /// Must not be called while holding a reference into `entries`.
    fn sweep_expired(&self, now: Instant) {
        let elapsed = millis(now.saturating_duration_since(self.sweep.origin));
        let due = self.sweep.next_ms.load(Ordering::Relaxed);
        if elapsed < due {
            return;
        }
        let next = elapsed.saturating_add(millis(SWEEP_INTERVAL));
        if self
            .sweep
            .next_ms
            .compare_exchange(due, next, Ordering::Relaxed, Ordering::Relaxed)
            .is_err()
        {
            return;
        }

        let before = self.entries.len();
        self.entries.retain(|_, e| e.is_live(now));
        let evicted = before.saturating_sub(self.entries.len());
        if evicted > 0 {
            debug!(evicted, "Swept expired entries");
        }
    }

    /// Remaining time to live of a key, `None` if missing or persistent.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.entries
            .get(key)
            .filter(|e| e.is_live(now))
            .and_then(|e| e.expires_at)
            .map(|at| at.saturating_duration_since(now))
    }

    /// All keys that have not expired, sorted.
    pub fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.value().is_live(now))
            .map(|e| e.key().clone())
            .collect();
        keys.sort();
        keys
    }

    fn add(&self, key: &str, delta: i64) -> KvResult<i64> {
        let now = Instant::now();
        self.sweep_expired(now);
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry {
                value: "0".to_string(),
                expires_at: None,
            });

        // An expired counter is recreated from zero without TTL, as Redis does.
        if !entry.is_live(now) {
            *entry = Entry {
                value: "0".to_string(),
                expires_at: None,
            };
        }

        let current: i64 = entry.value.parse().map_err(|_| KvError::NotInteger {
            key: key.to_string(),
        })?;
        let next = current.checked_add(delta).ok_or_else(|| KvError::Overflow {
            key: key.to_string(),
        })?;
        entry.value = next.to_string();
        Ok(next)
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        let now = Instant::now();
        {
            let Some(entry) = self.entries.get(key) else {
                return Ok(None);
            };
            if entry.is_live(now) {
                return Ok(Some(entry.value.clone()));
            }
        }
        self.entries.remove_if(key, |_, e| !e.is_live(now));
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> KvResult<()> {
        let now = Instant::now();
        self.sweep_expired(now);
        let expires_at = effective_ttl(ttl).map(|d| now + d);
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn incr(&self, key: &str) -> KvResult<i64> {
        self.add(key, 1)
    }

    async fn decr(&self, key: &str) -> KvResult<i64> {
        self.add(key, -1)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> KvResult<bool> {
        let now = Instant::now();
        match self.entries.get_mut(key) {
            Some(mut entry) if entry.is_live(now) => {
                entry.expires_at = Some(now + ttl);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

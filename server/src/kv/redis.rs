//! Redis backend for the KV gateway.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use fred::prelude::{Client, ClientLike, Config, Expiration, KeysInterface};
use tracing::{info, warn};

use super::{effective_ttl, KvError, KvResult, KvStore};

/// Create Redis client.
pub async fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let config = Config::from_url(redis_url)?;
    let client = Client::new(config, None, None, None);
    client.connect();
    client.wait_for_connect().await?;

    info!("Connected to Redis");
    Ok(client)
}

/// [`KvStore`] backed by a shared Redis connection.
///
/// Every command is bounded by `command_timeout`, so a stalled store turns
/// into a `KvError::Timeout` instead of a hung request.
#[derive(Clone)]
pub struct RedisStore {
    client: Client,
    command_timeout: Duration,
}

impl RedisStore {
    pub const fn new(client: Client, command_timeout: Duration) -> Self {
        Self {
            client,
            command_timeout,
        }
    }

    /// Runs a Redis command under the per-command deadline.
    async fn bounded<T, F>(&self, command: F) -> KvResult<T>
    where
        F: Future<Output = Result<T, fred::error::Error>> + Send,
    {
        match tokio::time::timeout(self.command_timeout, command).await {
            Ok(result) => result.map_err(|e| {
                warn!(error = %e, "Redis command failed");
                KvError::from(e)
            }),
            Err(_) => {
                warn!(timeout = ?self.command_timeout, "Redis command timed out");
                Err(KvError::Timeout(self.command_timeout))
            }
        }
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        self.bounded(self.client.get::<Option<String>, _>(key))
            .await
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> KvResult<()> {
        let expiration = effective_ttl(ttl).map(|d| Expiration::PX(d.as_millis() as i64));
        self.bounded(
            self.client
                .set::<(), _, _>(key, value, expiration, None, false),
        )
        .await
    }

    async fn incr(&self, key: &str) -> KvResult<i64> {
        self.bounded(self.client.incr::<i64, _>(key)).await
    }

    async fn decr(&self, key: &str) -> KvResult<i64> {
        self.bounded(self.client.decr::<i64, _>(key)).await
    }

    async fn expire(&self, key: &str, ttl: Duration) -> KvResult<bool> {
        self.bounded(
            self.client
                .pexpire::<bool, _>(key, ttl.as_millis() as i64, None),
        )
        .await
    }
}

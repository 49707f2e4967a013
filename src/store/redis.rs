use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::AsyncCommands;

use super::KvStore;

/// [`KvStore`] backed by a multiplexed Redis connection.
pub struct RedisStore {
    conn: redis::aio::MultiplexedConnection,
}

impl RedisStore {
    /// Connects to the Redis instance at `url`, e.g. `redis://127.0.0.1:6379`.
    ///
    /// The connection lives for one pipeline run and is released when the
    /// store is dropped.
    pub async fn connect(url: &str) -> Result<Self> {
        let client =
            redis::Client::open(url).with_context(|| format!("invalid Redis URL '{url}'"))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .with_context(|| format!("failed to connect to Redis at '{url}'"))?;

        Ok(Self { conn })
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn set(&mut self, key: &str, value: f64) -> Result<()> {
        self.conn
            .set::<_, _, ()>(key, value)
            .await
            .with_context(|| format!("Redis SET failed for key '{key}'"))?;
        Ok(())
    }
}

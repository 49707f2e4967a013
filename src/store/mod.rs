//! Key-value store seam for the load stage.
//!
//! [`KvStore`] is the narrow write interface the publisher goes through;
//! [`RedisStore`] implements it over a Redis connection. Tests substitute
//! an in-memory map.

mod redis;

pub use self::redis::RedisStore;

use anyhow::Result;

/// A key-value store with last-write-wins `set` semantics per key.
#[async_trait::async_trait]
pub trait KvStore: Send {
    /// Writes `value` under `key`, overwriting any existing value.
    async fn set(&mut self, key: &str, value: f64) -> Result<()>;
}

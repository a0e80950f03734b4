//! Redis-backed shared counter.

use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use tracing::debug;

use crate::domain::repositories::{CounterError, IdCounter};

/// Default Redis key holding the counter.
pub const DEFAULT_COUNTER_KEY: &str = "url_counter";

/// Counter backed by Redis `INCR`, which is atomic across all clients.
pub struct RedisCounter {
    client: ConnectionManager,
    key: String,
}

impl RedisCounter {
    /// Creates a counter stored under `key`.
    pub fn new(client: ConnectionManager, key: impl Into<String>) -> Self {
        Self {
            client,
            key: key.into(),
        }
    }

    /// Returns the Redis key of the counter.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the last issued value without incrementing. `0` if nothing was issued yet.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::Backend`] on Redis errors.
    pub async fn current(&self) -> Result<i64, CounterError> {
        let mut conn = self.client.clone();
        let value: Option<i64> = conn.get(&self.key).await?;
        Ok(value.unwrap_or(0))
    }
}

#[async_trait]
impl IdCounter for RedisCounter {
    async fn next_id(&self) -> Result<i64, CounterError> {
        let mut conn = self.client.clone();
        let id: i64 = conn.incr(&self.key, 1).await?;
        debug!("Counter {} -> {}", self.key, id);
        Ok(id)
    }
}

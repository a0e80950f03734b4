//! Redis-backed cache implementation.

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use std::time::Duration;
use tracing::debug;

const KEY_PREFIX: &str = "url:";

/// Redis cache implementation for fast shortcode lookups.
///
/// Shares the `ConnectionManager` with [`crate::infrastructure::counter::RedisCounter`].
/// Errors are returned to the caller, which treats them as soft failures.
pub struct RedisCache {
    client: ConnectionManager,
}

impl RedisCache {
    /// Wraps an established Redis connection.
    pub fn new(client: ConnectionManager) -> Self {
        Self { client }
    }
}

/// Constructs the full Redis key with namespace prefix.
fn build_key(shortcode: &str) -> String {
    format!("{KEY_PREFIX}{shortcode}")
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_url(&self, shortcode: &str) -> CacheResult<Option<String>> {
        let mut conn = self.client.clone();

        let url: Option<String> = conn.get(build_key(shortcode)).await?;
        match &url {
            Some(url) => debug!("Cache HIT: {} -> {}", shortcode, url),
            None => debug!("Cache MISS: {}", shortcode),
        }

        Ok(url)
    }

    async fn set_url(&self, shortcode: &str, long_url: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.client.clone();
        // SET EX rejects a zero expiry.
        let ttl_seconds = ttl.as_secs().max(1);

        let _: () = conn
            .set_ex(build_key(shortcode), long_url, ttl_seconds)
            .await?;
        debug!(
            "Cache SET: {} -> {} (TTL: {}s)",
            shortcode, long_url, ttl_seconds
        );

        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}

//! Redis connection setup shared by the counter and the cache.

use redis::{AsyncCommands, Client, RedisResult, aio::ConnectionManager};
use tracing::info;

/// Connects to Redis and validates the connection with a PING.
///
/// The returned `ConnectionManager` reconnects transparently and is cheap to clone.
///
/// # Errors
///
/// Returns an error if the URL is invalid, the connection cannot be
/// established, or the PING fails.
pub async fn connect(redis_url: &str) -> RedisResult<ConnectionManager> {
    let client = Client::open(redis_url)?;
    let manager = ConnectionManager::new(client).await?;

    let mut test_conn = manager.clone();
    test_conn.ping::<()>().await?;

    info!("✓ Connected to Redis");

    Ok(manager)
}

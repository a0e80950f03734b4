//! Shared counter capability used for shortcode issuance.

use async_trait::async_trait;

/// Errors raised by the counter service.
#[derive(Debug, thiserror::Error)]
pub enum CounterError {
    #[error("counter backend error: {0}")]
    Backend(#[from] redis::RedisError),
}

/// A process-external, monotonically increasing counter.
///
/// Every call to [`IdCounter::next_id`] must be a single atomic increment on a
/// counter shared by all service instances. Uniqueness of generated shortcodes
/// relies on this; a non-atomic implementation voids it.
///
/// # Implementations
///
/// - [`crate::infrastructure::counter::RedisCounter`] - Redis `INCR`
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdCounter: Send + Sync {
    /// Atomically increments the counter and returns the new value.
    ///
    /// Increments are never rolled back, even when the caller later fails.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError`] if the counter service cannot be reached.
    async fn next_id(&self) -> Result<i64, CounterError>;
}

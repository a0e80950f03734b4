//! Repository trait for the durable shortcode store.

use crate::domain::entities::UrlRecord;
use async_trait::async_trait;

/// Errors raised by the durable store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Repository interface for shortcode mappings.
///
/// Records are keyed uniquely by shortcode and are never updated or deleted.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_url.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Finds a record by its shortcode.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(UrlRecord))` if found
    /// - `Ok(None)` if not found
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be reached.
    async fn find_by_code(&self, shortcode: &str) -> Result<Option<UrlRecord>, StoreError>;

    /// Inserts a record unless its shortcode is already taken.
    ///
    /// Returns `Ok(true)` when the record was written and `Ok(false)` when another
    /// record already holds the shortcode. Existing records are never overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be reached.
    async fn insert_if_absent(&self, record: UrlRecord) -> Result<bool, StoreError>;

    /// Checks that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be reached.
    async fn ping(&self) -> Result<(), StoreError>;
}

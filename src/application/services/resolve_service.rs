//! Shortcode resolution service (cache-aside read path).

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::repositories::{StoreError, UrlRepository};
use crate::infrastructure::cache::CacheService;

/// Errors returned by [`ResolveService::resolve`].
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("shortcode not found: {0}")]
    NotFound(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

/// Service resolving shortcodes back to long URLs.
///
/// # Cache Strategy
///
/// - **Cache hit**: returned immediately, the store is not queried
/// - **Cache miss or cache error**: store lookup, then a cache write with the configured TTL
/// - **Cache write error**: logged, the resolution still succeeds
///
/// Store errors are never masked as "not found". Records are immutable, so
/// entries are never invalidated.
pub struct ResolveService<R: UrlRepository + ?Sized, K: CacheService + ?Sized> {
    repository: Arc<R>,
    cache: Arc<K>,
    cache_ttl: Duration,
}

impl<R: UrlRepository + ?Sized, K: CacheService + ?Sized> ResolveService<R, K> {
    /// Creates a new resolve service.
    pub fn new(repository: Arc<R>, cache: Arc<K>, cache_ttl: Duration) -> Self {
        Self {
            repository,
            cache,
            cache_ttl,
        }
    }

    /// Returns the long URL stored under `shortcode`.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::NotFound`] if no record holds the shortcode
    /// - [`ResolveError::StoreUnavailable`] if the store cannot be queried
    pub async fn resolve(&self, shortcode: &str) -> Result<String, ResolveError> {
        match self.cache.get_url(shortcode).await {
            Ok(Some(long_url)) => {
                metrics::counter!("tinylink_cache_hits_total").increment(1);
                return Ok(long_url);
            }
            Ok(None) => {
                metrics::counter!("tinylink_cache_misses_total").increment(1);
            }
            Err(e) => {
                warn!(%shortcode, error = %e, "Cache read failed, falling back to store");
                metrics::counter!("tinylink_cache_errors_total").increment(1);
            }
        }

        let Some(record) = self.repository.find_by_code(shortcode).await? else {
            debug!(%shortcode, "Shortcode not found");
            return Err(ResolveError::NotFound(shortcode.to_string()));
        };

        if let Err(e) = self
            .cache
            .set_url(shortcode, &record.long_url, self.cache_ttl)
            .await
        {
            warn!(%shortcode, error = %e, "Failed to populate cache");
            metrics::counter!("tinylink_cache_errors_total").increment(1);
        }

        Ok(record.long_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::UrlRecord;
    use crate::domain::repositories::MockUrlRepository;
    use crate::infrastructure::cache::{CacheError, MockCacheService};
    use chrono::Utc;
    use mockall::predicate::eq;

    const TTL: Duration = Duration::from_secs(86_400);

    fn record(shortcode: &str, long_url: &str) -> UrlRecord {
        UrlRecord::new(shortcode.to_string(), long_url.to_string(), Utc::now())
    }

    fn service(
        repository: MockUrlRepository,
        cache: MockCacheService,
    ) -> ResolveService<MockUrlRepository, MockCacheService> {
        ResolveService::new(Arc::new(repository), Arc::new(cache), TTL)
    }

    #[tokio::test]
    async fn test_cache_hit_skips_store() {
        let mut cache = MockCacheService::new();
        cache
            .expect_get_url()
            .with(eq("abc"))
            .times(1)
            .returning(|_| Ok(Some("https://example.com".to_string())));
        cache.expect_set_url().never();

        let mut repository = MockUrlRepository::new();
        repository
            .expect_find_by_code()
            .never()
            .returning(|_| Err(StoreError::Database(sqlx::Error::PoolClosed)));

        let url = service(repository, cache).resolve("abc").await.unwrap();

        assert_eq!(url, "https://example.com");
    }

    #[tokio::test]
    async fn test_cache_miss_reads_store_and_populates_cache() {
        let mut cache = MockCacheService::new();
        cache.expect_get_url().times(1).returning(|_| Ok(None));
        cache
            .expect_set_url()
            .with(eq("xyz"), eq("https://example.com/long"), eq(TTL))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut repository = MockUrlRepository::new();
        repository
            .expect_find_by_code()
            .with(eq("xyz"))
            .times(1)
            .returning(|code| Ok(Some(record(code, "https://example.com/long"))));

        let url = service(repository, cache).resolve("xyz").await.unwrap();

        assert_eq!(url, "https://example.com/long");
    }

    #[tokio::test]
    async fn test_cache_miss_and_store_miss_is_not_found() {
        let mut cache = MockCacheService::new();
        cache.expect_get_url().times(1).returning(|_| Ok(None));
        cache.expect_set_url().never();

        let mut repository = MockUrlRepository::new();
        repository
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(None));

        let result = service(repository, cache).resolve("missing").await;

        assert!(matches!(result, Err(ResolveError::NotFound(code)) if code == "missing"));
    }

    #[tokio::test]
    async fn test_cache_read_error_falls_back_to_store() {
        let mut cache = MockCacheService::new();
        cache
            .expect_get_url()
            .times(1)
            .returning(|_| Err(CacheError::OperationError("connection refused".to_string())));
        cache
            .expect_set_url()
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut repository = MockUrlRepository::new();
        repository
            .expect_find_by_code()
            .times(1)
            .returning(|code| Ok(Some(record(code, "https://example.com"))));

        let url = service(repository, cache).resolve("abc").await.unwrap();

        assert_eq!(url, "https://example.com");
    }

    #[tokio::test]
    async fn test_cache_write_error_does_not_fail_resolution() {
        let mut cache = MockCacheService::new();
        cache.expect_get_url().times(1).returning(|_| Ok(None));
        cache
            .expect_set_url()
            .times(1)
            .returning(|_, _, _| Err(CacheError::OperationError("READONLY".to_string())));

        let mut repository = MockUrlRepository::new();
        repository
            .expect_find_by_code()
            .times(1)
            .returning(|code| Ok(Some(record(code, "https://example.com"))));

        let url = service(repository, cache).resolve("abc").await.unwrap();

        assert_eq!(url, "https://example.com");
    }

    #[tokio::test]
    async fn test_store_error_is_not_reported_as_not_found() {
        let mut cache = MockCacheService::new();
        cache
            .expect_get_url()
            .times(1)
            .returning(|_| Err(CacheError::OperationError("connection refused".to_string())));
        cache.expect_set_url().never();

        let mut repository = MockUrlRepository::new();
        repository
            .expect_find_by_code()
            .times(1)
            .returning(|_| Err(StoreError::Database(sqlx::Error::PoolTimedOut)));

        let result = service(repository, cache).resolve("abc").await;

        assert!(matches!(result, Err(ResolveError::StoreUnavailable(_))));
    }
}

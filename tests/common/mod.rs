#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tinylink::application::services::{DynResolveService, DynShortenService};
use tinylink::domain::entities::UrlRecord;
use tinylink::domain::repositories::{CounterError, IdCounter, StoreError, UrlRepository};
use tinylink::infrastructure::cache::{CacheError, CacheResult, CacheService};
use tinylink::state::AppState;
use tinylink::utils::code_encoder::CodeEncoder;

pub const BASE_URL: &str = "https://sho.rt";
pub const TEST_SALT: &str = "integration-salt";
pub const CACHE_TTL: Duration = Duration::from_secs(86_400);

/// Store backed by a `HashMap`, counting reads and writes.
#[derive(Default)]
pub struct MemoryUrlRepository {
    records: Mutex<HashMap<String, UrlRecord>>,
    pub lookups: AtomicUsize,
    pub inserts: AtomicUsize,
}

impl MemoryUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, shortcode: &str, long_url: &str) {
        let record = UrlRecord::new(shortcode.to_string(), long_url.to_string(), Utc::now());
        self.records
            .lock()
            .unwrap()
            .insert(shortcode.to_string(), record);
    }

    pub fn get(&self, shortcode: &str) -> Option<UrlRecord> {
        self.records.lock().unwrap().get(shortcode).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl UrlRepository for MemoryUrlRepository {
    async fn find_by_code(&self, shortcode: &str) -> Result<Option<UrlRecord>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.get(shortcode))
    }

    async fn insert_if_absent(&self, record: UrlRecord) -> Result<bool, StoreError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().unwrap();
        if records.contains_key(&record.shortcode) {
            return Ok(false);
        }
        records.insert(record.shortcode.clone(), record);
        Ok(true)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Store whose every call fails as if the database were down.
pub struct FailingRepository;

#[async_trait]
impl UrlRepository for FailingRepository {
    async fn find_by_code(&self, _shortcode: &str) -> Result<Option<UrlRecord>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn insert_if_absent(&self, _record: UrlRecord) -> Result<bool, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }
}

/// Store whose lookups take `delay`; `finished` flips only if a lookup runs to completion.
pub struct SlowRepository {
    delay: Duration,
    pub finished: AtomicBool,
}

impl SlowRepository {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            finished: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl UrlRepository for SlowRepository {
    async fn find_by_code(&self, _shortcode: &str) -> Result<Option<UrlRecord>, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.finished.store(true, Ordering::SeqCst);
        Ok(None)
    }

    async fn insert_if_absent(&self, _record: UrlRecord) -> Result<bool, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.finished.store(true, Ordering::SeqCst);
        Ok(true)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Counter yielding `start + 1, start + 2, ...`.
pub struct SequenceCounter {
    value: AtomicI64,
}

impl SequenceCounter {
    pub fn starting_at(start: i64) -> Self {
        Self {
            value: AtomicI64::new(start),
        }
    }
}

#[async_trait]
impl IdCounter for SequenceCounter {
    async fn next_id(&self) -> Result<i64, CounterError> {
        Ok(self.value.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// Counter that is always unreachable.
pub struct FailingCounter;

#[async_trait]
impl IdCounter for FailingCounter {
    async fn next_id(&self) -> Result<i64, CounterError> {
        Err(CounterError::Backend(
            std::io::Error::from(std::io::ErrorKind::ConnectionRefused).into(),
        ))
    }
}

/// Cache backed by a `HashMap`, recording the TTL of each write.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (String, Duration)>>,
    pub healthy: bool,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::default(),
            healthy: true,
        }
    }

    pub fn unhealthy() -> Self {
        Self {
            entries: Mutex::default(),
            healthy: false,
        }
    }

    pub fn entry(&self, shortcode: &str) -> Option<(String, Duration)> {
        self.entries.lock().unwrap().get(shortcode).cloned()
    }

    pub fn put(&self, shortcode: &str, long_url: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(shortcode.to_string(), (long_url.to_string(), CACHE_TTL));
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_url(&self, shortcode: &str) -> CacheResult<Option<String>> {
        if !self.healthy {
            return Err(CacheError::OperationError("connection refused".to_string()));
        }
        Ok(self.entry(shortcode).map(|(url, _)| url))
    }

    async fn set_url(&self, shortcode: &str, long_url: &str, ttl: Duration) -> CacheResult<()> {
        if !self.healthy {
            return Err(CacheError::OperationError("connection refused".to_string()));
        }
        self.entries
            .lock()
            .unwrap()
            .insert(shortcode.to_string(), (long_url.to_string(), ttl));
        Ok(())
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }
}

pub fn test_encoder() -> Arc<CodeEncoder> {
    Arc::new(CodeEncoder::with_salt(TEST_SALT).unwrap())
}

/// Wires the services over the given components the same way the server does.
pub fn create_state(
    counter: Arc<dyn IdCounter>,
    repository: Arc<dyn UrlRepository>,
    cache: Arc<dyn CacheService>,
) -> AppState {
    let shorten_service = Arc::new(DynShortenService::new(
        counter,
        repository.clone(),
        test_encoder(),
        BASE_URL,
        5,
    ));
    let resolve_service = Arc::new(DynResolveService::new(
        repository.clone(),
        cache.clone(),
        CACHE_TTL,
    ));

    AppState::new(shorten_service, resolve_service, repository, cache)
}

/// State over healthy in-memory components, returned alongside them for inspection.
pub fn create_test_state() -> (AppState, Arc<MemoryUrlRepository>, Arc<MemoryCache>) {
    let repository = Arc::new(MemoryUrlRepository::new());
    let cache = Arc::new(MemoryCache::new());
    let state = create_state(
        Arc::new(SequenceCounter::starting_at(0)),
        repository.clone(),
        cache.clone(),
    );

    (state, repository, cache)
}

//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{DynResolveService, DynShortenService};
use crate::domain::repositories::UrlRepository;
use crate::infrastructure::cache::CacheService;

/// Handler state.
///
/// Holds only `Arc`s to immutable services, so cloning per request is cheap and
/// handlers run concurrently without locking.
#[derive(Clone)]
pub struct AppState {
    pub shorten_service: Arc<DynShortenService>,
    pub resolve_service: Arc<DynResolveService>,
    pub repository: Arc<dyn UrlRepository>,
    pub cache: Arc<dyn CacheService>,
}

impl AppState {
    pub fn new(
        shorten_service: Arc<DynShortenService>,
        resolve_service: Arc<DynResolveService>,
        repository: Arc<dyn UrlRepository>,
        cache: Arc<dyn CacheService>,
    ) -> Self {
        Self {
            shorten_service,
            resolve_service,
            repository,
            cache,
        }
    }
}

//! Business logic services for the application layer.

pub mod resolve_service;
pub mod shorten_service;

pub use resolve_service::{ResolveError, ResolveService};
pub use shorten_service::{DEFAULT_MAX_ATTEMPTS, ShortenError, ShortenService, ShortenedUrl};

use crate::domain::repositories::{IdCounter, UrlRepository};
use crate::infrastructure::cache::CacheService;

/// Shorten service over trait objects, as held by [`crate::state::AppState`].
pub type DynShortenService = ShortenService<dyn IdCounter, dyn UrlRepository>;

/// Resolve service over trait objects, as held by [`crate::state::AppState`].
pub type DynResolveService = ResolveService<dyn UrlRepository, dyn CacheService>;

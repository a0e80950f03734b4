//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{shortcode}`       - Short link redirect
//! - `GET  /health`            - Health check: store and cache
//! - `POST /api/v1/shorten`    - Create a short link (rate limited per IP)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Timeout** - Requests exceeding the configured deadline are abandoned
//! - **Rate limiting** - Per-IP token bucket on the shorten endpoint
//! - **Path normalization** - Trailing slash handling

use std::time::Duration;

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::rate_limit::{self, RateLimit};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::timeout::TimeoutLayer;

/// HTTP-level options for [`app_router`].
#[derive(Debug, Clone, Copy)]
pub struct RouterOptions {
    /// Deadline for a whole request. Dropping the handler future cancels
    /// any in-flight store, cache or counter call.
    pub request_timeout: Duration,
    /// Shorten endpoint rate limit, `None` to disable.
    pub rate_limit: Option<RateLimit>,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            rate_limit: Some(RateLimit::default()),
        }
    }
}

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState, options: RouterOptions) -> NormalizePath<Router> {
    let mut api_router = api::routes::api_routes();
    if let Some(limiter) = options.rate_limit.and_then(rate_limit::layer) {
        api_router = api_router.layer(limiter);
    }

    let router = Router::new()
        .route("/{shortcode}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api/v1", api_router)
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::SERVICE_UNAVAILABLE,
            options.request_timeout,
        ))
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

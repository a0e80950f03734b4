//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

/// Per-IP rate limiting layer applied to the shorten endpoint.
pub type ShortenRateLimitLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Token bucket parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    /// Tokens replenished per second.
    pub per_second: u64,
    /// Maximum bucket size.
    pub burst_size: u32,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            per_second: 2,
            burst_size: 100,
        }
    }
}

/// Creates a rate limiter for the shorten endpoint.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// Rate limits are applied per client IP address extracted from the
/// socket peer address, so the router must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
///
/// Returns `None` when either parameter is zero, which disables limiting.
///
/// # Example
///
/// ```rust,ignore
/// let mut app = Router::new().route("/shorten", post(shorten_handler));
/// if let Some(limiter) = rate_limit::layer(RateLimit::default()) {
///     app = app.layer(limiter);
/// }
/// ```
pub fn layer(limit: RateLimit) -> Option<ShortenRateLimitLayer> {
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(limit.per_second)
        .burst_size(limit.burst_size)
        .finish()?;

    Some(GovernorLayer::new(Arc::new(governor_conf)))
}

//! HTTP request/response tracing middleware.

use axum::extract::MatchedPath;
use axum::http::Request;
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, MakeSpan, TraceLayer};
use tracing::{Level, Span};

/// Trace layer with a [`RequestSpan`] per request.
pub type RequestTraceLayer = TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    RequestSpan,
    DefaultOnRequest,
    DefaultOnResponse,
>;

/// Builds the `request` span.
///
/// Fields:
/// - `method`
/// - `route`: the matched route template (`/{shortcode}`, `/api/v1/shorten`,
///   `/health`), or `unmatched`
/// - `path`: the concrete request path, which carries the shortcode on redirects
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        tracing::info_span!(
            "request",
            method = %request.method(),
            route = route_of(request),
            path = %request.uri().path(),
        )
    }
}

fn route_of<B>(request: &Request<B>) -> &str {
    request
        .extensions()
        .get::<MatchedPath>()
        .map_or("unmatched", MatchedPath::as_str)
}

/// Creates a tracing middleware for HTTP requests.
///
/// # Example Logs
///
/// ```text
/// INFO request{method=GET route=/{shortcode} path=/aB3xY9k}: finished processing request latency=2 ms status=301
/// INFO request{method=POST route=/api/v1/shorten path=/api/v1/shorten}: finished processing request latency=4 ms status=201
/// ```
///
/// Must be added with `Router::layer` so that [`MatchedPath`] is already set.
pub fn layer() -> RequestTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(RequestSpan)
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}

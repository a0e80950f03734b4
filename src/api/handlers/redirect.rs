//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// Longest path segment treated as a possible shortcode.
const MAX_SHORTCODE_LENGTH: usize = 128;

/// Redirects a shortcode to its long URL.
///
/// # Endpoint
///
/// `GET /{shortcode}`
///
/// # Request Flow
///
/// 1. Check the cache for the shortcode
/// 2. On a miss (or cache error), query the store
/// 3. Populate the cache with the configured TTL
/// 4. Return 301 Moved Permanently
///
/// # Errors
///
/// Returns 404 Not Found if the shortcode doesn't exist.
/// Returns 503 Service Unavailable if the store is unreachable.
/// Returns 500 Internal Server Error if the stored URL is not a valid header value.
pub async fn redirect_handler(
    Path(shortcode): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    if shortcode.len() > MAX_SHORTCODE_LENGTH {
        return Err(AppError::not_found(
            "Short link not found",
            json!({ "shortcode": shortcode }),
        ));
    }

    let long_url = state.resolve_service.resolve(&shortcode).await?;

    // Records written before input validation may not be valid header values.
    let location = HeaderValue::try_from(long_url).map_err(|_| {
        AppError::internal(
            "Stored URL cannot be used as a redirect target",
            json!({ "shortcode": shortcode }),
        )
    })?;

    Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]))
}

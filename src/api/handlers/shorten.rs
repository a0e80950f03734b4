//! Handler for the link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::url_validator::validate_long_url;

/// Creates a short URL for a long URL.
///
/// # Endpoint
///
/// `POST /api/v1/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "short_url": "https://sho.rt/aB3xY9k",
///   "shortcode": "aB3xY9k"
/// }
/// ```
///
/// # Errors
///
/// - 400 Bad Request for malformed JSON or an invalid URL
/// - 503 Service Unavailable if the counter or the store is unreachable
/// - 500 Internal Server Error if no free shortcode was found
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    validate_long_url(&payload.url).map_err(|e| {
        AppError::bad_request("Invalid URL", json!({ "reason": e.to_string() }))
    })?;

    let shortened = state.shorten_service.shorten(&payload.url).await?;

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse {
            short_url: shortened.short_url,
            shortcode: shortened.shortcode,
        }),
    ))
}

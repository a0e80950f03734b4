//! DTOs for the shorten endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::url_validator::MAX_URL_LENGTH;

/// `validator` length bounds are `u64`.
const MAX_URL_CHARS: u64 = MAX_URL_LENGTH as u64;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL to shorten (absolute HTTP/HTTPS URL).
    #[validate(
        length(min = 1, max = MAX_URL_CHARS, message = "URL must be 1-2048 characters"),
        url(message = "Invalid URL format")
    )]
    pub url: String,
}

/// Response for a created short link.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub short_url: String,
    pub shortcode: String,
}

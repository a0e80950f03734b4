//! URL record entity representing a stored shortcode mapping.

use chrono::{DateTime, Utc};

/// An immutable shortcode → long URL mapping.
///
/// Created exactly once by [`crate::application::services::ShortenService`] and never
/// updated afterwards; `shortcode` is unique across the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub shortcode: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
}

impl UrlRecord {
    /// Creates a new UrlRecord instance.
    pub fn new(shortcode: String, long_url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            shortcode,
            long_url,
            created_at,
        }
    }
}

//! Shortcode issuance service.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::domain::entities::UrlRecord;
use crate::domain::repositories::{CounterError, IdCounter, StoreError, UrlRepository};
use crate::utils::code_encoder::{CodeEncoder, EncodeError};

/// Default number of attempts per shorten call.
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Errors returned by [`ShortenService::shorten`].
#[derive(Debug, thiserror::Error)]
pub enum ShortenError {
    #[error("counter unavailable: {0}")]
    CounterUnavailable(#[from] CounterError),

    #[error("failed to encode counter value: {0}")]
    Encode(#[from] EncodeError),

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    #[error("no free shortcode after {attempts} attempts")]
    CollisionLimitExceeded { attempts: usize },
}

/// Result of a successful shorten call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenedUrl {
    pub shortcode: String,
    pub short_url: String,
}

/// Service issuing shortcodes for long URLs.
///
/// Each attempt takes the next value of the shared counter, encodes it and
/// writes the record if the shortcode is still free. Counter monotonicity is what
/// keeps shortcodes unique; the existence check only guards against counter
/// resets, several counters serving one store, or operator error.
pub struct ShortenService<C: IdCounter + ?Sized, R: UrlRepository + ?Sized> {
    counter: Arc<C>,
    repository: Arc<R>,
    encoder: Arc<CodeEncoder>,
    base_url: String,
    max_attempts: usize,
}

impl<C: IdCounter + ?Sized, R: UrlRepository + ?Sized> ShortenService<C, R> {
    /// Creates a new shorten service.
    ///
    /// A trailing `/` on `base_url` is dropped. `max_attempts` is clamped to at least 1.
    pub fn new(
        counter: Arc<C>,
        repository: Arc<R>,
        encoder: Arc<CodeEncoder>,
        base_url: impl Into<String>,
        max_attempts: usize,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            counter,
            repository,
            encoder,
            base_url,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Builds the public short URL for a shortcode.
    pub fn short_url(&self, shortcode: &str) -> String {
        format!("{}/{}", self.base_url, shortcode)
    }

    /// Stores `long_url` under a freshly issued shortcode.
    ///
    /// Attempts run strictly one after another. Counter values consumed by
    /// failed attempts are not reclaimed.
    ///
    /// # Errors
    ///
    /// - [`ShortenError::CounterUnavailable`] if the counter cannot be incremented
    /// - [`ShortenError::Encode`] if the counter returns a negative value
    /// - [`ShortenError::StoreUnavailable`] if the store cannot be read or written
    /// - [`ShortenError::CollisionLimitExceeded`] if every attempt hit a taken shortcode
    pub async fn shorten(&self, long_url: &str) -> Result<ShortenedUrl, ShortenError> {
        let mut collisions: Vec<(i64, String)> = Vec::new();

        for attempt in 1..=self.max_attempts {
            let id = self.counter.next_id().await?;
            let value = u64::try_from(id).map_err(|_| EncodeError::NegativeId(id))?;
            let shortcode = self.encoder.encode(value);

            if self.repository.find_by_code(&shortcode).await?.is_some() {
                warn!(attempt, id, %shortcode, "Shortcode collision");
                metrics::counter!("tinylink_collisions_total").increment(1);
                collisions.push((id, shortcode));
                continue;
            }

            let record = UrlRecord::new(shortcode.clone(), long_url.to_string(), Utc::now());
            if !self.repository.insert_if_absent(record).await? {
                warn!(attempt, id, %shortcode, "Shortcode taken before insert");
                metrics::counter!("tinylink_collisions_total").increment(1);
                collisions.push((id, shortcode));
                continue;
            }

            if attempt > 1 {
                info!(attempt, %shortcode, "Shortcode issued after collisions");
            } else {
                debug!(id, %shortcode, "Shortcode issued");
            }
            metrics::counter!("tinylink_shorten_total").increment(1);

            let short_url = self.short_url(&shortcode);
            return Ok(ShortenedUrl {
                shortcode,
                short_url,
            });
        }

        error!(
            attempts = self.max_attempts,
            collisions = ?collisions,
            "Collision retry budget exhausted; counter may have been reset or is shared"
        );

        Err(ShortenError::CollisionLimitExceeded {
            attempts: self.max_attempts,
        })
    }
}

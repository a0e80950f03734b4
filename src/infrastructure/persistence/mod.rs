//! PostgreSQL repository implementations.
//!
//! - [`PgUrlRepository`] - Shortcode storage and retrieval

pub mod pg_url_repository;

pub use pg_url_repository::PgUrlRepository;

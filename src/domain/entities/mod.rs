//! Core domain entities.
//!
//! - [`UrlRecord`] - A shortcode → long URL mapping

pub mod url_record;

pub use url_record::UrlRecord;

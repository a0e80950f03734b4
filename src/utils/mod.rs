//! Utility functions for shortcode encoding and URL validation.
//!
//! - [`code_encoder`] - Salted integer ↔ shortcode bijection
//! - [`url_validator`] - Long URL validation

pub mod code_encoder;
pub mod url_validator;

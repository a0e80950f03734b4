//! Application layer services implementing the core shortening logic.
//!
//! Services consume the domain ports ([`crate::domain::repositories`]) and the
//! cache trait, and provide a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::shorten_service::ShortenService`] - Counter → encode → collision check → persist
//! - [`services::resolve_service::ResolveService`] - Cache-aside shortcode resolution

pub mod services;

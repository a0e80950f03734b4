//! Domain layer containing the shortcode data model and its ports.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Store and counter trait definitions
//!
//! The domain layer has no dependencies on the HTTP layer. Concrete store and
//! counter implementations live in [`crate::infrastructure`].

pub mod entities;
pub mod repositories;

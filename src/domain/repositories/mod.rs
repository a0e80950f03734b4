//! Ports to the external components the core depends on.
//!
//! These traits are implemented by the infrastructure layer and consumed by the
//! application services.
//!
//! - [`UrlRepository`] - Durable shortcode store
//! - [`IdCounter`] - Shared atomic counter
//!
//! Mock implementations are generated via `mockall` for unit tests.

pub mod id_counter;
pub mod url_repository;

pub use id_counter::{CounterError, IdCounter};
pub use url_repository::{StoreError, UrlRepository};

#[cfg(test)]
pub use id_counter::MockIdCounter;
#[cfg(test)]
pub use url_repository::MockUrlRepository;

//! Infrastructure layer for external integrations.
//!
//! Implements the ports defined by the domain layer plus the cache trait.
//!
//! - [`cache`] - Caching abstractions (Redis and no-op implementations)
//! - [`counter`] - Shared atomic counter (Redis)
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`connection`] - Redis connection setup

pub mod cache;
pub mod connection;
pub mod counter;
pub mod persistence;

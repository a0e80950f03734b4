//! Shared counter implementations.

mod redis_counter;

pub use redis_counter::{DEFAULT_COUNTER_KEY, RedisCounter};

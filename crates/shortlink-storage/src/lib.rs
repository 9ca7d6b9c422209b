//! Storage backends for the shortlink service.
//!
//! [`RedisBackend`] is the production adapter; [`InMemoryBackend`] keeps
//! everything in process and is used by tests and single-node setups.

pub mod memory;
pub mod redis;

pub use crate::memory::InMemoryBackend;
pub use crate::redis::{KeyLayout, RedisBackend};

//! In-process read-through cache with per-entry TTL.

pub mod keys;
mod ttl;

pub use ttl::{CacheStats, Generation, TtlCache};

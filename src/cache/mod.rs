//! Cache Module
//!
//! Provides the concurrent key-value store with per-entry TTL and the
//! public cache handle.

mod handle;
mod stats;
mod store;


// Re-export public types
pub use handle::Cache;
pub use stats::{CacheStats, StatsSnapshot};
pub use store::{CacheStore, Lookup};

//! lazykv - A lightweight in-process key-value cache
//!
//! Thread-safe mapping from string keys to arbitrary values with
//! optional per-entry TTL. Expiration is lazy: an expired entry is
//! detected on read, reported as a miss, and handed to a background
//! reclaimer for removal, so reads only ever take a shared lock.
//!
//! # Example
//! ```
//! use lazykv::Cache;
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let cache = Cache::new();
//!
//! cache.set("session", "token".to_string(), Some(Duration::from_secs(5))).await;
//! assert_eq!(cache.get("session").await, Some("token".to_string()));
//!
//! cache.shutdown().await;
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheStats, CacheStore, Lookup, StatsSnapshot};
pub use config::CacheConfig;
pub use error::ConfigError;

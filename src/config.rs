//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment
//! variables.

use std::env;

use crate::error::ConfigError;

/// Default bound on the reclaim signal queue.
const DEFAULT_RECLAIM_QUEUE_DEPTH: usize = 64;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults, or set programmatically through the builder methods.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Capacity of the bounded queue that hands expired keys to the
    /// reclaimer. When the queue is full, further expired reads drop
    /// their signal instead of blocking; the key is re-signaled on the
    /// next read.
    pub reclaim_queue_depth: usize,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment
    /// variables.
    ///
    /// # Environment Variables
    /// - `LAZYKV_RECLAIM_QUEUE_DEPTH` - Reclaim queue capacity
    ///   (default: 64, must be a positive integer)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(raw) = env::var("LAZYKV_RECLAIM_QUEUE_DEPTH") {
            let depth: usize = raw.parse().map_err(|_| ConfigError::InvalidValue {
                var: "LAZYKV_RECLAIM_QUEUE_DEPTH",
                value: raw.clone(),
            })?;
            if depth == 0 {
                return Err(ConfigError::InvalidValue {
                    var: "LAZYKV_RECLAIM_QUEUE_DEPTH",
                    value: raw,
                });
            }
            config.reclaim_queue_depth = depth;
        }

        Ok(config)
    }

    /// Sets the reclaim queue capacity.
    pub fn with_reclaim_queue_depth(mut self, depth: usize) -> Self {
        self.reclaim_queue_depth = depth;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            reclaim_queue_depth: DEFAULT_RECLAIM_QUEUE_DEPTH,
        }
    }
}

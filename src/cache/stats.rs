//! Cache Statistics Module
//!
//! Tracks cache performance metrics. Counters are atomic so the read
//! path can record hits and misses while holding only the shared lock.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Atomic counters shared between callers and the reclaimer.
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    hits: AtomicU64,
    /// Number of failed cache retrievals (key absent or expired)
    misses: AtomicU64,
    /// Number of reads that found a present-but-expired entry
    expired_reads: AtomicU64,
    /// Number of entries physically removed by the reclaimer
    reclaimed: AtomicU64,
}

// == Stats Snapshot ==
/// A point-in-time copy of the counters, suitable for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key absent or expired)
    pub misses: u64,
    /// Number of reads that found a present-but-expired entry
    pub expired_reads: u64,
    /// Number of entries physically removed by the reclaimer
    pub reclaimed: u64,
    /// Current number of physically present entries
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Expired Read ==
    /// Increments the expired-read counter. Every expired read is also a
    /// miss; callers record both.
    pub fn record_expired_read(&self) {
        self.expired_reads.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Reclaimed ==
    /// Increments the reclaimed counter.
    pub fn record_reclaimed(&self) {
        self.reclaimed.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Copies the counters into a serializable snapshot.
    ///
    /// `total_entries` is supplied by the caller, which knows the store
    /// length at the moment of the snapshot.
    pub fn snapshot(&self, total_entries: usize) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expired_reads: self.expired_reads.load(Ordering::Relaxed),
            reclaimed: self.reclaimed.load(Ordering::Relaxed),
            total_entries,
        }
    }
}

impl StatsSnapshot {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

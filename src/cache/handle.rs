//! Cache Handle Module
//!
//! Public entry point for the cache. `Cache` owns the locked store, the
//! shared statistics, and the lifecycle of the background reclaimer that
//! it starts on construction.
//!
//! # Locking
//! `get` only ever takes the shared lock; `set` and `delete` take the
//! exclusive lock. When a read finds an expired entry it releases the
//! lock, reports a miss, and hands the key to the reclaimer instead of
//! deleting in place, so readers never serialize behind each other.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::cache::store::{CacheStore, Lookup};
use crate::cache::{CacheStats, StatsSnapshot};
use crate::config::CacheConfig;
use crate::tasks::spawn_reclaimer;

// == Cache ==
/// A concurrent key-value cache with per-entry TTL and lazy cleanup.
///
/// Cloning the handle is cheap and every clone addresses the same store.
/// Construction starts a single background reclaimer task whose handle
/// the cache owns; [`Cache::shutdown`] stops and joins it exactly once.
/// Dropping every handle also stops the reclaimer, because the signal
/// channel closes.
#[derive(Debug)]
pub struct Cache<V> {
    /// The guarded parallel mappings
    store: Arc<RwLock<CacheStore<V>>>,
    /// Shared hit/miss/reclaim counters
    stats: Arc<CacheStats>,
    /// Bounded handoff of expired keys to the reclaimer
    reclaim_tx: mpsc::Sender<String>,
    /// Shutdown flag observed by the reclaimer
    shutdown_tx: watch::Sender<bool>,
    /// Reclaimer task handle, taken by the first shutdown
    worker: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl<V> Clone for Cache<V> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            stats: self.stats.clone(),
            reclaim_tx: self.reclaim_tx.clone(),
            shutdown_tx: self.shutdown_tx.clone(),
            worker: self.worker.clone(),
        }
    }
}

impl<V> Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a cache with the default configuration and starts its
    /// background reclaimer.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates a cache with the given configuration and starts its
    /// background reclaimer.
    pub fn with_config(config: CacheConfig) -> Self {
        let store = Arc::new(RwLock::new(CacheStore::new()));
        let stats = Arc::new(CacheStats::new());
        let (reclaim_tx, reclaim_rx) = mpsc::channel(config.reclaim_queue_depth);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let worker = spawn_reclaimer(store.clone(), stats.clone(), reclaim_rx, shutdown_rx);

        Self {
            store,
            stats,
            reclaim_tx,
            shutdown_tx,
            worker: Arc::new(Mutex::new(Some(worker))),
        }
    }

    // == Set ==
    /// Inserts or fully overwrites `key` with `value`.
    ///
    /// A positive `ttl` makes the entry expire that long from now; `None`
    /// (or a zero duration) makes it persist until explicitly deleted.
    /// Always succeeds. Both mappings are updated under the exclusive
    /// lock, atomically with respect to every other operation.
    pub async fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let key = key.into();
        trace!(key = %key, ttl = ?ttl, "set");

        let mut store = self.store.write().await;
        store.insert(key, value, ttl);
    }

    // == Get ==
    /// Returns the value for `key`, or `None` if the key is absent or
    /// expired.
    ///
    /// An expired entry is never returned. Detecting one does not mutate
    /// the store: the key is handed to the reclaimer after the shared
    /// lock is released, and the physical removal happens asynchronously.
    /// The handoff never blocks; if the reclaim queue is full or the
    /// reclaimer has stopped, the entry simply stays until a later read
    /// or an explicit delete.
    pub async fn get(&self, key: &str) -> Option<V> {
        let outcome = {
            let store = self.store.read().await;
            store.lookup(key)
        };

        match outcome {
            Lookup::Hit(value) => {
                self.stats.record_hit();
                Some(value)
            }
            Lookup::Miss => {
                self.stats.record_miss();
                None
            }
            Lookup::Expired => {
                self.stats.record_expired_read();
                self.stats.record_miss();

                match self.reclaim_tx.try_send(key.to_string()) {
                    Ok(()) => trace!(key = %key, "expired key handed to reclaimer"),
                    Err(TrySendError::Full(_)) => {
                        debug!(key = %key, "reclaim queue full, key stays until next read")
                    }
                    Err(TrySendError::Closed(_)) => {
                        debug!(key = %key, "reclaimer stopped, expired key left in place")
                    }
                }

                None
            }
        }
    }

    // == Delete ==
    /// Removes `key` from the cache.
    ///
    /// Returns whether an entry was actually removed; deleting an absent
    /// key is a harmless no-op. Never errors.
    pub async fn delete(&self, key: &str) -> bool {
        let removed = {
            let mut store = self.store.write().await;
            store.remove(key)
        };
        trace!(key = %key, removed, "delete");
        removed
    }

    // == Shutdown ==
    /// Stops the background reclaimer and waits for it to finish.
    ///
    /// Idempotent: safe to call any number of times, from any handle,
    /// concurrently. The first call joins the worker; later calls wait
    /// for that join to complete and then return. Pending reclaim
    /// signals are discarded, not processed.
    pub async fn shutdown(&self) {
        let mut worker = self.worker.lock().await;
        self.shutdown_tx.send_replace(true);
        if let Some(handle) = worker.take() {
            let _ = handle.await;
            debug!("reclaimer stopped");
        }
    }

    // == Contains ==
    /// Returns true if `key` is physically present, even if it is
    /// expired but not yet reclaimed.
    pub async fn contains_key(&self, key: &str) -> bool {
        self.store.read().await.contains_key(key)
    }

    // == Length ==
    /// Returns the number of physically present entries.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    // == Stats ==
    /// Returns a point-in-time snapshot of the cache counters.
    pub async fn stats(&self) -> StatsSnapshot {
        let total_entries = self.store.read().await.len();
        self.stats.snapshot(total_entries)
    }
}

impl<V> Default for Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

//! Reclaimer Task
//!
//! Background worker that physically removes keys flagged as expired by
//! the read path. A single worker consumes signals strictly sequentially;
//! removal volume is expected to be low relative to read volume, so one
//! consumer is enough and keeps removals serialized.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::sync::watch;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

use crate::cache::{CacheStats, CacheStore};

/// Spawns the background reclaimer for a cache store.
///
/// The worker runs until either the shutdown flag flips or every sender
/// on the signal channel is gone, whichever happens first. Each received
/// key is removed through the store's single removal path under the
/// exclusive lock, but only if it is still expired at processing time: a
/// signal describes an old incarnation of the key, and a fresh `set`
/// that landed after the expired read must survive. Signals for absent
/// keys (duplicates, or a racing explicit delete) are no-ops.
///
/// On shutdown, pending signals are drained and discarded rather than
/// processed, so the store may retain stale-but-present entries. Those
/// are never returned to readers.
pub fn spawn_reclaimer<V>(
    store: Arc<RwLock<CacheStore<V>>>,
    stats: Arc<CacheStats>,
    mut signals: mpsc::Receiver<String>,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    V: Send + Sync + 'static,
{
    tokio::spawn(async move {
        debug!("reclaimer started");

        loop {
            tokio::select! {
                // Shutdown wins over pending work, so stop requests are
                // honored even when the signal queue is non-empty.
                biased;

                changed = shutdown.changed() => {
                    // A closed shutdown channel means every cache handle
                    // is gone; treat it the same as an explicit stop.
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                key = signals.recv() => {
                    let Some(key) = key else {
                        // All senders dropped
                        break;
                    };

                    let removed = {
                        let mut store = store.write().await;
                        // Re-check under the exclusive lock: the key may
                        // have been deleted, or overwritten with a fresh
                        // value, since the signal was sent.
                        match store.deadline(&key) {
                            Some(deadline) if deadline <= Instant::now() => store.remove(&key),
                            _ => false,
                        }
                    };

                    if removed {
                        stats.record_reclaimed();
                        trace!(key = %key, "reclaimed expired key");
                    } else {
                        trace!(key = %key, "key absent or no longer expired, nothing to reclaim");
                    }
                }
            }
        }

        // Leave senders unblocked: discard whatever is still queued.
        let mut discarded = 0usize;
        while signals.try_recv().is_ok() {
            discarded += 1;
        }
        signals.close();

        if discarded > 0 {
            info!(discarded, "reclaimer stopped, pending signals discarded");
        } else {
            debug!("reclaimer stopped");
        }
    })
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::sleep;

    fn harness<V: Send + Sync + 'static>() -> (
        Arc<RwLock<CacheStore<V>>>,
        Arc<CacheStats>,
        mpsc::Sender<String>,
        watch::Sender<bool>,
        JoinHandle<()>,
    ) {
        let store = Arc::new(RwLock::new(CacheStore::new()));
        let stats = Arc::new(CacheStats::new());
        let (tx, rx) = mpsc::channel(16);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = spawn_reclaimer(store.clone(), stats.clone(), rx, shutdown_rx);
        (store, stats, tx, shutdown_tx, handle)
    }

    async fn insert_expired(store: &RwLock<CacheStore<String>>, key: &str) {
        store
            .write()
            .await
            .insert(key.to_string(), "v".to_string(), Some(Duration::from_millis(10)));
        sleep(Duration::from_millis(20)).await;
    }

    async fn wait_until_gone(store: &RwLock<CacheStore<String>>, key: &str) {
        for _ in 0..50 {
            if !store.read().await.contains_key(key) {
                return;
            }
            sleep(Duration::from_millis(10)).await;
        }
        panic!("key {key:?} was never reclaimed");
    }

    #[tokio::test]
    async fn test_reclaimer_removes_signaled_key() {
        let (store, stats, tx, shutdown_tx, handle) = harness();

        insert_expired(&store, "k").await;
        tx.send("k".to_string()).await.unwrap();

        wait_until_gone(&store, "k").await;
        assert_eq!(stats.snapshot(0).reclaimed, 1);

        shutdown_tx.send_replace(true);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_reclaimer_tolerates_duplicate_signals() {
        let (store, stats, tx, shutdown_tx, handle) = harness();

        insert_expired(&store, "k").await;

        tx.send("k".to_string()).await.unwrap();
        tx.send("k".to_string()).await.unwrap();
        tx.send("unrelated".to_string()).await.unwrap();

        wait_until_gone(&store, "k").await;

        // A trailing signal for a second expired key acts as a barrier:
        // once it is reclaimed, the duplicate and unrelated signals have
        // been consumed too.
        insert_expired(&store, "k2").await;
        tx.send("k2".to_string()).await.unwrap();
        wait_until_gone(&store, "k2").await;

        // Only the first "k" signal and the barrier found work to do
        assert_eq!(stats.snapshot(0).reclaimed, 2);
        assert!(store.read().await.is_empty());

        shutdown_tx.send_replace(true);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_reclaimer_spares_freshly_overwritten_key() {
        let (store, stats, tx, shutdown_tx, handle) = harness();

        insert_expired(&store, "k").await;

        // The overwrite lands after expiry was detected but before the
        // signal is processed; the stale signal must not remove it.
        store
            .write()
            .await
            .insert("k".to_string(), "fresh".to_string(), None);
        tx.send("k".to_string()).await.unwrap();

        // Barrier signal so we know "k" has been looked at
        insert_expired(&store, "k2").await;
        tx.send("k2".to_string()).await.unwrap();
        wait_until_gone(&store, "k2").await;

        assert!(store.read().await.contains_key("k"));
        assert_eq!(stats.snapshot(1).reclaimed, 1);

        shutdown_tx.send_replace(true);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_reclaimer_stops_on_shutdown_flag() {
        let (_store, _stats, _tx, shutdown_tx, handle) = harness::<String>();

        shutdown_tx.send_replace(true);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_reclaimer_stops_when_senders_drop() {
        let (_store, _stats, tx, _shutdown_tx, handle) = harness::<String>();

        drop(tx);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_reclaimer_discards_pending_signals_on_shutdown() {
        let store = Arc::new(RwLock::new(CacheStore::new()));
        let stats = Arc::new(CacheStats::new());
        let (tx, rx) = mpsc::channel(16);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        store
            .write()
            .await
            .insert("k".to_string(), "v".to_string(), None);

        // Flip the flag before the worker exists so it stops before
        // draining the queue.
        shutdown_tx.send_replace(true);
        tx.send("k".to_string()).await.unwrap();

        let handle = spawn_reclaimer(store.clone(), stats.clone(), rx, shutdown_rx);
        handle.await.unwrap();

        // The signal was discarded, not processed
        assert!(store.read().await.contains_key("k"));
        assert_eq!(stats.snapshot(1).reclaimed, 0);
    }
}

//! Cache Store Module
//!
//! The guarded core of the cache: two parallel mappings (values and
//! expiration deadlines) that are always mutated together. This type is
//! synchronous and lock-free by itself; `Cache` wraps it in an `RwLock`
//! and enforces the shared/exclusive discipline.

use std::collections::HashMap;
use std::time::{Duration, Instant};

// == Lookup Outcome ==
/// Result of a read against the store.
///
/// `Expired` means the key is physically present but its deadline has
/// passed; the caller is expected to report a miss and hand the key to
/// the reclaimer rather than delete it in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<V> {
    /// Key present and not expired
    Hit(V),
    /// Key present but past its deadline (stale-but-present)
    Expired,
    /// Key absent
    Miss,
}

// == Cache Store ==
/// Key-value storage with optional per-key expiration deadlines.
///
/// Keys present in `expirations` are always also present in `values`;
/// both maps are mutated together by every method. The only tolerated
/// skew is a logically expired entry that has not been reclaimed yet.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    values: HashMap<String, V>,
    /// Expiration deadline per key; absent means the key never expires
    expirations: HashMap<String, Instant>,
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            expirations: HashMap::new(),
        }
    }

    // == Insert ==
    /// Inserts or fully overwrites `key`.
    ///
    /// A positive `ttl` records a deadline of now + ttl. `None` (or a
    /// zero duration) stores the key without expiration. An overwrite
    /// replaces both the value and the deadline, so re-setting a key
    /// without a TTL clears any previous deadline.
    pub fn insert(&mut self, key: String, value: V, ttl: Option<Duration>) {
        match ttl.filter(|ttl| !ttl.is_zero()) {
            Some(ttl) => {
                self.expirations.insert(key.clone(), Instant::now() + ttl);
            }
            None => {
                self.expirations.remove(&key);
            }
        }
        self.values.insert(key, value);
    }

    // == Lookup ==
    /// Reads `key` without mutating either map.
    ///
    /// Boundary condition: a key whose deadline is at or before the
    /// current instant is expired; its value is never returned.
    pub fn lookup(&self, key: &str) -> Lookup<V>
    where
        V: Clone,
    {
        let Some(value) = self.values.get(key) else {
            return Lookup::Miss;
        };

        match self.expirations.get(key) {
            Some(deadline) if *deadline <= Instant::now() => Lookup::Expired,
            _ => Lookup::Hit(value.clone()),
        }
    }

    // == Remove ==
    /// Removes `key` from both maps.
    ///
    /// Returns whether a value was actually removed; removing an absent
    /// key is a no-op. This is the single removal path; the public
    /// delete and the reclaimer both go through it.
    pub fn remove(&mut self, key: &str) -> bool {
        self.expirations.remove(key);
        self.values.remove(key).is_some()
    }

    // == Deadline ==
    /// Returns the expiration deadline recorded for `key`, if any.
    pub fn deadline(&self, key: &str) -> Option<Instant> {
        self.expirations.get(key).copied()
    }

    // == Contains ==
    /// Returns true if `key` is physically present, expired or not.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    // == Length ==
    /// Returns the number of physically present entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<V> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

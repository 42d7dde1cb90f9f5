//! Result cache for previously merged words.
//!
//! The cache is insert-once-until-full: nothing is ever evicted, so once
//! `capacity` entries are stored every further insert is dropped until the
//! cache is cleared. Words that become hot after that point are never cached.

use ahash::AHashMap;
use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use subword_core::Word;
use tracing::{trace, warn};

/// Default number of entries kept by a tokenizer's cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Thread-safe, capacity-bounded map behind a single reader/writer lock.
///
/// Lock poisoning is treated as a miss on read and a dropped insert on write;
/// the cache is an optimisation and never a source of errors.
#[derive(Debug)]
pub struct Cache<K, V> {
    map: RwLock<AHashMap<K, V>>,
    capacity: usize,
    full_reported: AtomicBool,
}

/// Cache of finished words keyed by their input string.
pub type WordCache = Cache<String, Word>;

impl<K, V> Cache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create a cache holding at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: RwLock::new(AHashMap::with_capacity(capacity)),
            capacity,
            full_reported: AtomicBool::new(false),
        }
    }

    /// Create a cache with [`DEFAULT_CACHE_CAPACITY`].
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Look up a value, cloning it out under the read lock.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let map = self.map.read().ok()?;
        map.get(key).cloned()
    }

    /// Look up several values at once; misses are left out.
    pub fn get_values<'a, Q, I>(&self, keys: I) -> Vec<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'a,
        I: IntoIterator<Item = &'a Q>,
    {
        let Ok(map) = self.map.read() else {
            return Vec::new();
        };
        keys.into_iter()
            .filter_map(|key| map.get(key).cloned())
            .collect()
    }

    /// Insert a value unless the cache is already full.
    pub fn set(&self, key: K, value: V) {
        if let Ok(mut map) = self.map.write() {
            if map.len() < self.capacity {
                map.insert(key, value);
            } else {
                self.report_full();
            }
        }
    }

    /// Insert several values, stopping as soon as the cache is full.
    pub fn set_values<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        if let Ok(mut map) = self.map.write() {
            for (key, value) in entries {
                if map.len() >= self.capacity {
                    self.report_full();
                    break;
                }
                map.insert(key, value);
            }
        }
    }

    /// Remove every entry.
    pub fn clear(&self) {
        if let Ok(mut map) = self.map.write() {
            map.clear();
        }
        self.full_reported.store(false, Ordering::Relaxed);
        trace!("cache cleared");
    }

    /// Get the number of entries in the cache.
    pub fn len(&self) -> usize {
        self.map.read().map(|map| map.len()).unwrap_or(0)
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the cache capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn report_full(&self) {
        if !self.full_reported.swap(true, Ordering::Relaxed) {
            warn!(
                capacity = self.capacity,
                "cache is full, further entries are dropped until it is cleared"
            );
        }
    }
}

impl<K, V> Default for Cache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

//! Bounded LRU store with optional entry age limit
//!
//! Synchronous, single-owner storage. [`InMemoryCacheProvider`] puts it
//! behind a mutex to satisfy the async provider contract.
//!
//! [`InMemoryCacheProvider`]: crate::cache::InMemoryCacheProvider

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use crate::cache::config::InMemoryCacheOptions;

#[derive(Debug)]
struct LruEntry<V> {
    value: V,
    last_access: u64,
    stored_at: Instant,
}

/// LRU store
///
/// Recency is tracked with a monotonically increasing access counter.
/// Eviction scans for the smallest counter, which keeps the store free of
/// linked-list bookkeeping at the cost of O(n) eviction.
#[derive(Debug)]
pub struct LruStore<K, V> {
    entries: HashMap<K, LruEntry<V>>,
    capacity: Option<usize>,
    max_age: Option<Duration>,
    stale: bool,
    update_age_on_get: bool,
    access_counter: u64,
    stats: LruStats,
}

/// Counters kept by [`LruStore`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LruStats {
    pub entries: usize,
    /// None = unbounded
    pub capacity: Option<usize>,
    pub hits: u64,
    pub misses: u64,
    /// Entries dropped to make room
    pub evictions: u64,
    /// Entries dropped for exceeding the age limit
    pub expirations: u64,
}

impl LruStats {
    /// Hit rate (0.0 - 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl<K: Eq + Hash + Clone, V: Clone> LruStore<K, V> {
    /// Unbounded store without expiry
    pub fn unbounded() -> Self {
        Self::with_options(&InMemoryCacheOptions::default())
    }

    /// Store holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self::with_options(&InMemoryCacheOptions::new().with_max(capacity))
    }

    pub fn with_options(options: &InMemoryCacheOptions) -> Self {
        let capacity = options.capacity();
        Self {
            entries: capacity
                .map(|c| HashMap::with_capacity(c.min(1024)))
                .unwrap_or_default(),
            capacity,
            max_age: options.max_age(),
            stale: options.stale,
            update_age_on_get: options.update_age_on_get,
            access_counter: 0,
            stats: LruStats::default(),
        }
    }

    fn is_expired(&self, entry: &LruEntry<V>, now: Instant) -> bool {
        match self.max_age {
            Some(max_age) => now.duration_since(entry.stored_at) > max_age,
            None => false,
        }
    }

    /// Look up a value and mark it most recently used.
    ///
    /// Expired entries are deleted; with `stale` enabled the expired value
    /// is returned one last time.
    pub fn get(&mut self, key: &K) -> Option<V> {
        let now = Instant::now();
        let expired = match self.entries.get(key) {
            Some(entry) => self.is_expired(entry, now),
            None => {
                self.stats.misses += 1;
                return None;
            }
        };

        if expired {
            self.stats.expirations += 1;
            let entry = self.entries.remove(key)?;
            if self.stale {
                self.stats.hits += 1;
                return Some(entry.value);
            }
            self.stats.misses += 1;
            return None;
        }

        self.access_counter += 1;
        let counter = self.access_counter;
        let update_age = self.update_age_on_get;
        let entry = self.entries.get_mut(key)?;
        entry.last_access = counter;
        if update_age {
            entry.stored_at = now;
        }
        self.stats.hits += 1;
        Some(entry.value.clone())
    }

    /// Look up a value without touching recency or counters
    pub fn peek(&self, key: &K) -> Option<&V> {
        let now = Instant::now();
        self.entries
            .get(key)
            .filter(|entry| !self.is_expired(entry, now))
            .map(|entry| &entry.value)
    }

    /// Check for a live entry without touching recency
    pub fn contains(&self, key: &K) -> bool {
        self.peek(key).is_some()
    }

    /// Insert or overwrite a value, evicting the least recently used entry
    /// when the store is full.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.access_counter += 1;
        let now = Instant::now();

        if let Some(entry) = self.entries.get_mut(&key) {
            entry.last_access = self.access_counter;
            entry.stored_at = now;
            return Some(std::mem::replace(&mut entry.value, value));
        }

        if let Some(capacity) = self.capacity {
            while self.entries.len() >= capacity {
                if !self.evict_lru() {
                    break;
                }
            }
        }

        self.entries.insert(
            key,
            LruEntry {
                value,
                last_access: self.access_counter,
                stored_at: now,
            },
        );
        None
    }

    /// Remove an entry; absent keys are ignored
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|e| e.value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop every expired entry, returning how many were removed
    pub fn prune(&mut self) -> usize {
        if self.max_age.is_none() {
            return 0;
        }
        let now = Instant::now();
        let before = self.entries.len();
        let max_age = self.max_age;
        self.entries.retain(|_, e| match max_age {
            Some(max_age) => now.duration_since(e.stored_at) <= max_age,
            None => true,
        });
        let removed = before - self.entries.len();
        self.stats.expirations += removed as u64;
        removed
    }

    /// Keys ordered from most to least recently used
    pub fn keys(&self) -> Vec<K> {
        let mut keyed: Vec<_> = self
            .entries
            .iter()
            .map(|(k, e)| (e.last_access, k.clone()))
            .collect();
        keyed.sort_by(|a, b| b.0.cmp(&a.0));
        keyed.into_iter().map(|(_, k)| k).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn stats(&self) -> LruStats {
        LruStats {
            entries: self.entries.len(),
            capacity: self.capacity,
            ..self.stats.clone()
        }
    }

    fn evict_lru(&mut self) -> bool {
        let lru_key = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.last_access)
            .map(|(k, _)| k.clone());

        match lru_key {
            Some(key) => {
                self.entries.remove(&key);
                self.stats.evictions += 1;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_lru_basic() {
        let mut store = LruStore::new(3);

        store.insert("a", 1);
        store.insert("b", 2);
        store.insert("c", 3);

        assert_eq!(store.get(&"a"), Some(1));
        assert_eq!(store.get(&"b"), Some(2));
        assert_eq!(store.get(&"c"), Some(3));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_lru_eviction() {
        let mut store = LruStore::new(2);

        store.insert("a", 1);
        store.insert("b", 2);

        // Access "a" to make it more recent
        store.get(&"a");

        // Insert "c", should evict "b" (least recently used)
        store.insert("c", 3);

        assert_eq!(store.get(&"a"), Some(1));
        assert_eq!(store.get(&"b"), None);
        assert_eq!(store.get(&"c"), Some(3));
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_capacity_one() {
        let mut store = LruStore::new(1);
        store.insert("a", 1);
        store.insert("b", 2);
        assert_eq!(store.get(&"a"), None);
        assert_eq!(store.get(&"b"), Some(2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_overwrite_does_not_evict() {
        let mut store = LruStore::new(2);

        store.insert("a", 1);
        store.insert("b", 2);
        let old = store.insert("a", 10);

        assert_eq!(old, Some(1));
        assert_eq!(store.get(&"a"), Some(10));
        assert_eq!(store.get(&"b"), Some(2));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_peek_keeps_recency() {
        let mut store = LruStore::new(2);
        store.insert("a", 1);
        store.insert("b", 2);

        // peek must not save "a"
        assert_eq!(store.peek(&"a"), Some(&1));
        store.insert("c", 3);

        assert!(!store.contains(&"a"));
        assert!(store.contains(&"b"));
    }

    #[test]
    fn test_unbounded() {
        let mut store = LruStore::unbounded();
        for i in 0..1000 {
            store.insert(i, i * 2);
        }
        assert_eq!(store.len(), 1000);
        assert_eq!(store.capacity(), None);
        assert_eq!(store.get(&0), Some(0));
    }

    #[test]
    fn test_keys_most_recent_first() {
        let mut store = LruStore::new(3);
        store.insert("a", 1);
        store.insert("b", 2);
        store.insert("c", 3);
        store.get(&"a");

        assert_eq!(store.keys(), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_max_age_expiry() {
        let options = InMemoryCacheOptions::new().with_max_age(Duration::from_millis(20));
        let mut store = LruStore::with_options(&options);

        store.insert("a", 1);
        assert_eq!(store.get(&"a"), Some(1));

        sleep(Duration::from_millis(40));
        assert!(!store.contains(&"a"));
        assert_eq!(store.get(&"a"), None);
        assert!(store.is_empty());
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_zero_max_age_never_expires() {
        let options = InMemoryCacheOptions::new().with_max_age(Duration::ZERO);
        let mut store = LruStore::with_options(&options);

        store.insert("a", 1);
        sleep(Duration::from_millis(5));
        assert_eq!(store.get(&"a"), Some(1));
        assert_eq!(store.prune(), 0);
    }

    #[test]
    fn test_stale_returns_expired_value_once() {
        let options = InMemoryCacheOptions::new()
            .with_max_age(Duration::from_millis(20))
            .with_stale(true);
        let mut store = LruStore::with_options(&options);

        store.insert("a", 1);
        sleep(Duration::from_millis(40));

        assert_eq!(store.get(&"a"), Some(1));
        assert_eq!(store.get(&"a"), None);
    }

    #[test]
    fn test_prune() {
        let options = InMemoryCacheOptions::new().with_max_age(Duration::from_millis(20));
        let mut store = LruStore::with_options(&options);

        store.insert("a", 1);
        store.insert("b", 2);
        sleep(Duration::from_millis(40));
        store.insert("c", 3);

        assert_eq!(store.prune(), 2);
        assert_eq!(store.keys(), vec!["c"]);
    }

    #[test]
    fn test_stats_hit_rate() {
        let mut store = LruStore::new(4);
        store.insert("a", 1);
        store.get(&"a");
        store.get(&"a");
        store.get(&"a");
        store.get(&"missing");

        let stats = store.stats();
        assert_eq!(stats.hits, 3);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.capacity, Some(4));
        assert!((stats.hit_rate() - 0.75).abs() < 0.001);
    }
}

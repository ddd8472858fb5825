//! Reference in-memory provider

use async_trait::async_trait;
use parking_lot::Mutex;
use std::hash::Hash;

use super::CacheProvider;
use crate::cache::config::InMemoryCacheOptions;
use crate::cache::util::{LruStats, LruStore};
use crate::Result;

/// In-memory LRU provider
///
/// Never fails. Every operation completes without suspending; the mutex is
/// released before the returned future resolves.
///
/// # Example
///
/// ```rust,ignore
/// let cache = InMemoryCacheProvider::<CacheKey, String>::with_options(
///     InMemoryCacheOptions::new().with_max(500),
/// );
/// cache.set(CacheKey::from("a"), "1".to_string()).await?;
/// assert_eq!(cache.get(&CacheKey::from("a")).await?, Some("1".to_string()));
/// ```
#[derive(Debug)]
pub struct InMemoryCacheProvider<K, V> {
    store: Mutex<LruStore<K, V>>,
    options: InMemoryCacheOptions,
}

impl<K, V> InMemoryCacheProvider<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Unbounded provider
    pub fn new() -> Self {
        Self::with_options(InMemoryCacheOptions::default())
    }

    /// Provider holding at most `max` entries
    pub fn with_max(max: usize) -> Self {
        Self::with_options(InMemoryCacheOptions::new().with_max(max))
    }

    pub fn with_options(options: InMemoryCacheOptions) -> Self {
        Self {
            store: Mutex::new(LruStore::with_options(&options)),
            options,
        }
    }

    pub fn options(&self) -> &InMemoryCacheOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    /// Check for a live entry without touching recency
    pub fn contains(&self, key: &K) -> bool {
        self.store.lock().contains(key)
    }

    /// Read a value without touching recency
    pub fn peek(&self, key: &K) -> Option<V> {
        self.store.lock().peek(key).cloned()
    }

    /// Keys from most to least recently used
    pub fn keys(&self) -> Vec<K> {
        self.store.lock().keys()
    }

    /// Drop expired entries now instead of on next access
    pub fn prune(&self) -> usize {
        self.store.lock().prune()
    }

    pub fn stats(&self) -> LruStats {
        self.store.lock().stats()
    }
}

impl<K, V> Default for InMemoryCacheProvider<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<K, V> CacheProvider<K, V> for InMemoryCacheProvider<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        "in-memory"
    }

    async fn get(&self, key: &K) -> Result<Option<V>> {
        Ok(self.store.lock().get(key))
    }

    async fn set(&self, key: K, value: V) -> Result<()> {
        self.store.lock().insert(key, value);
        Ok(())
    }

    async fn remove(&self, key: &K) -> Result<()> {
        self.store.lock().remove(key);
        Ok(())
    }

    async fn remove_all(&self) -> Result<()> {
        self.store.lock().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::CacheKey;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_get_set_remove() {
        let cache = InMemoryCacheProvider::<CacheKey, u32>::new();
        let key = CacheKey::from("key1");

        assert_eq!(cache.get(&key).await.unwrap(), None);
        cache.set(key.clone(), 453535).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some(453535));

        cache.remove(&key).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_absent_key_is_ok() {
        let cache = InMemoryCacheProvider::<String, u32>::new();
        assert!(cache.remove(&"nothing".to_string()).await.is_ok());
    }

    #[tokio::test]
    async fn test_remove_all() {
        let cache = InMemoryCacheProvider::<u32, u32>::with_max(10);
        for i in 0..5 {
            cache.set(i, i).await.unwrap();
        }
        assert_eq!(cache.len(), 5);

        cache.remove_all().await.unwrap();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_refreshes_recency() {
        let cache = InMemoryCacheProvider::<&'static str, u32>::with_max(2);
        cache.set("a", 1).await.unwrap();
        cache.set("b", 2).await.unwrap();
        cache.get(&"a").await.unwrap();
        cache.set("c", 3).await.unwrap();

        assert!(cache.contains(&"a"));
        assert!(!cache.contains(&"b"));
        assert_eq!(cache.peek(&"c"), Some(3));
    }

    #[tokio::test]
    async fn test_max_age_from_options() {
        let options = InMemoryCacheOptions::from_json_str(r#"{ "max": 4, "maxAgeMs": 20 }"#).unwrap();
        let cache = InMemoryCacheProvider::<u32, u32>::with_options(options);
        cache.set(1, 1).await.unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(cache.get(&1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sub_millisecond_age_still_caches() {
        let options = InMemoryCacheOptions::new().with_max_age(Duration::from_micros(500));
        let cache = InMemoryCacheProvider::<u32, u32>::with_options(options);
        assert_eq!(cache.options().max_age(), Some(Duration::from_millis(1)));

        cache.set(1, 1).await.unwrap();
        assert_eq!(cache.len(), 1);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(cache.get(&1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_shared_through_arc() {
        let cache = Arc::new(InMemoryCacheProvider::<u32, String>::new());
        let shared: Arc<dyn CacheProvider<u32, String>> = cache.clone();

        shared.set(7, "seven".to_string()).await.unwrap();
        assert_eq!(cache.peek(&7), Some("seven".to_string()));
        assert_eq!(shared.name(), "in-memory");
    }

    #[tokio::test]
    async fn test_concurrent_sets() {
        let cache = Arc::new(InMemoryCacheProvider::<u32, u32>::with_max(1000));
        let mut handles = Vec::new();
        for task in 0..8u32 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..50u32 {
                    cache.set(task * 100 + i, i).await.unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(cache.len(), 400);
    }
}

//! Decorator engine
//!
//! [`Memoizer`] binds one cache provider and one diagnostic sink and turns
//! plain async functions into cached, evicting or cache-writing ones.

use memo_foundation::{
    CacheProvider, DiagnosticSink, Error, InMemoryCacheOptions, InMemoryCacheProvider, NoopSink,
    Result,
};
use parking_lot::RwLock;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use tracing::debug;

use super::config::DecoratorConfig;
use super::wrapped::{CachedCall, CachingWriteCall, EvictingCall};

/// State shared by the engine and every function it wrapped
pub(crate) struct Shared<K, V> {
    pub(crate) cache: Arc<dyn CacheProvider<K, V>>,
    sink: RwLock<Arc<dyn DiagnosticSink>>,
}

impl<K, V> Shared<K, V> {
    /// Hand an absorbed cache failure to the current sink
    pub(crate) fn report(&self, message: &str, cause: &Error) {
        debug!(
            provider = self.cache.name(),
            error = %cause,
            "Cache failure absorbed: {}",
            message
        );
        // Clone out so the sink runs without the lock held
        let sink = Arc::clone(&self.sink.read());
        sink.error(message, cause);
    }
}

/// Decorator engine
///
/// Every wrapped function produced by one `Memoizer` shares its provider.
/// Keys are not namespaced, so unrelated functions sharing a provider must
/// derive distinct keys.
///
/// # Example
///
/// ```rust,ignore
/// let memo: Memoizer<CacheKey, User> = Memoizer::in_memory(
///     InMemoryCacheOptions::new().with_max(1000),
/// );
///
/// let get_user = memo.cache_calls(|id: u64| db.fetch_user(id), DecoratorOptions::new());
/// let update_user = memo.add_result_to_cache(
///     |(id, patch): (u64, Patch)| db.update_user(id, patch),
///     DecoratorOptions::new(),
/// );
/// let delete_user = memo.evict_on_call(|id: u64| db.delete_user(id), DecoratorOptions::new());
///
/// let user = get_user.call(7).await?;
/// ```
pub struct Memoizer<K, V> {
    shared: Arc<Shared<K, V>>,
}

impl<K, V> Memoizer<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Engine over the given provider
    pub fn new(provider: impl CacheProvider<K, V> + 'static) -> Self {
        Self::from_shared(Arc::new(provider))
    }

    /// Engine over a provider the caller keeps a handle to
    pub fn from_shared(provider: Arc<dyn CacheProvider<K, V>>) -> Self {
        Self {
            shared: Arc::new(Shared {
                cache: provider,
                sink: RwLock::new(Arc::new(NoopSink)),
            }),
        }
    }

    /// Engine over a fresh in-memory LRU provider
    pub fn in_memory(options: InMemoryCacheOptions) -> Self {
        Self::new(InMemoryCacheProvider::with_options(options))
    }

    pub fn with_sink(self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.set_sink(sink);
        self
    }

    /// Replace the diagnostic sink.
    ///
    /// Takes effect for functions wrapped earlier as well.
    pub fn set_sink(&self, sink: Arc<dyn DiagnosticSink>) {
        *self.shared.sink.write() = sink;
    }

    /// Handle to the bound provider
    pub fn cache(&self) -> Arc<dyn CacheProvider<K, V>> {
        Arc::clone(&self.shared.cache)
    }

    /// Drop every cached entry.
    ///
    /// Unlike the decorators, this returns provider failures to the caller.
    pub async fn clear(&self) -> Result<()> {
        self.shared.cache.remove_all().await
    }

    /// Read-through caching.
    ///
    /// A cached value short-circuits the call; a miss calls `target` and
    /// stores its `Ok` value. Errors from `target` are returned unchanged
    /// and never cached.
    pub fn cache_calls<A, F, Fut, E>(
        &self,
        target: F,
        config: impl Into<DecoratorConfig<A, K>>,
    ) -> CachedCall<A, K, V, F>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
    {
        CachedCall::new(target, config.into(), Arc::clone(&self.shared))
    }

    /// Evict the call's key, then call `target`.
    ///
    /// `target` runs even when the eviction fails.
    pub fn evict_on_call<A, F, Fut>(
        &self,
        target: F,
        config: impl Into<DecoratorConfig<A, K>>,
    ) -> EvictingCall<A, K, V, F>
    where
        F: Fn(A) -> Fut,
        Fut: Future,
    {
        EvictingCall::new(target, config.into(), Arc::clone(&self.shared))
    }

    /// Call `target`, then store its `Ok` value under the call's key.
    ///
    /// `target` runs exactly once per call, skip condition or not.
    pub fn add_result_to_cache<A, F, Fut, E>(
        &self,
        target: F,
        config: impl Into<DecoratorConfig<A, K>>,
    ) -> CachingWriteCall<A, K, V, F>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
    {
        CachingWriteCall::new(target, config.into(), Arc::clone(&self.shared))
    }
}

impl<K, V> Default for Memoizer<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Unbounded in-memory provider, no sink
    fn default() -> Self {
        Self::in_memory(InMemoryCacheOptions::default())
    }
}

impl<K, V> Clone for Memoizer<K, V> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorator::{Decorated, DecoratorOptions};
    use memo_foundation::CacheKey;
    use parking_lot::Mutex;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider that fails every read
    struct Unreachable;

    #[async_trait::async_trait]
    impl CacheProvider<CacheKey, u32> for Unreachable {
        fn name(&self) -> &str {
            "unreachable"
        }

        async fn get(&self, _key: &CacheKey) -> Result<Option<u32>> {
            Err(Error::Unavailable("connection refused".to_string()))
        }

        async fn set(&self, _key: CacheKey, _value: u32) -> Result<()> {
            Ok(())
        }

        async fn remove(&self, _key: &CacheKey) -> Result<()> {
            Ok(())
        }

        async fn remove_all(&self) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_set_sink_reaches_existing_wrappers() {
        let memo = Memoizer::<CacheKey, u32>::new(Unreachable);
        let cached = memo.cache_calls(
            |n: u32| async move { Ok::<_, Infallible>(n * 2) },
            DecoratorOptions::new(),
        );

        // default sink swallows the failure
        assert_eq!(cached.call(2).await, Ok(4));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();
        memo.set_sink(Arc::new(move |message: &str, cause: &Error| {
            recorder.lock().push(format!("{}: {}", message, cause));
        }));

        assert_eq!(cached.call(3).await, Ok(6));
        assert_eq!(
            *seen.lock(),
            vec!["Could not get value from cache: Cache backend unavailable: connection refused"]
        );
    }

    #[tokio::test]
    async fn test_clear_and_clone_share_provider() {
        let memo: Memoizer<CacheKey, u32> = Memoizer::default();
        let twin = memo.clone();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let cached = twin.cache_calls(
            move |n: u32| {
                counter.fetch_add(1, Ordering::SeqCst);
                async move { Ok::<_, Infallible>(n) }
            },
            DecoratorOptions::new(),
        );

        cached.call(1).await.unwrap();
        assert!(memo.cache().get(&CacheKey::Int(1)).await.unwrap().is_some());

        memo.clear().await.unwrap();
        cached.call(1).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_boxed_decorated_functions() {
        let memo: Memoizer<CacheKey, u32> = Memoizer::default();
        let read = memo.cache_calls(
            |n: u32| async move { Ok::<_, Infallible>(n + 1) },
            DecoratorOptions::new(),
        );
        let write = memo.add_result_to_cache(
            |n: u32| async move { Ok::<_, Infallible>(n + 100) },
            DecoratorOptions::new(),
        );

        let ops: Vec<Box<dyn Decorated<u32, Output = std::result::Result<u32, Infallible>>>> =
            vec![Box::new(write), Box::new(read)];

        assert_eq!(ops[0].call(7).await, Ok(107));
        // read is served the value written above
        assert_eq!(ops[1].call(7).await, Ok(107));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_into_fn_concurrent_misses_are_not_coalesced() {
        let memo: Memoizer<CacheKey, u32> = Memoizer::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let gate = Arc::new(tokio::sync::Barrier::new(2));

        let fetch = memo
            .cache_calls(
                move |n: u32| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    let gate = gate.clone();
                    async move {
                        // both callers are inside the target before either stores
                        gate.wait().await;
                        Ok::<_, Infallible>(n)
                    }
                },
                DecoratorOptions::new(),
            )
            .into_fn();

        let first = tokio::spawn(fetch.clone()(9));
        let second = tokio::spawn(fetch.clone()(9));
        assert_eq!(first.await.unwrap(), Ok(9));
        assert_eq!(second.await.unwrap(), Ok(9));
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // settled: later calls hit
        assert_eq!(fetch(9).await, Ok(9));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}

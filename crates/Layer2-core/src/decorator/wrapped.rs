//! Wrapped functions
//!
//! Each wrapper owns its target, its resolved [`DecoratorConfig`] and a
//! handle to the engine's shared state. Per call it evaluates the skip
//! condition, derives a key, performs at most one cache operation and calls
//! the target at most once.

use async_trait::async_trait;
use futures::future::BoxFuture;
use memo_foundation::{GET_FAILED, REMOVE_FAILED, SET_FAILED};
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, trace};

use super::config::DecoratorConfig;
use super::engine::Shared;

/// Uniform async call interface over the three wrapper kinds
///
/// Lets differently-decorated functions with the same argument type live
/// behind one `Box<dyn Decorated<A, Output = ...>>`.
#[async_trait]
pub trait Decorated<A: Send + 'static>: Send + Sync {
    type Output: Send;

    async fn call(&self, args: A) -> Self::Output;
}

macro_rules! wrapper_common {
    ($name:ident) => {
        impl<A, K, V, F> $name<A, K, V, F> {
            pub(crate) fn new(
                target: F,
                config: DecoratorConfig<A, K>,
                shared: Arc<Shared<K, V>>,
            ) -> Self {
                Self {
                    target,
                    config,
                    shared,
                    _args: PhantomData,
                }
            }

            pub fn config(&self) -> &DecoratorConfig<A, K> {
                &self.config
            }
        }

        impl<A, K, V, F: Clone> Clone for $name<A, K, V, F> {
            fn clone(&self) -> Self {
                Self {
                    target: self.target.clone(),
                    config: self.config.clone(),
                    shared: Arc::clone(&self.shared),
                    _args: PhantomData,
                }
            }
        }
    };
}

// ============================================================================
// CachedCall (read-through)
// ============================================================================

/// Read-through cached function, built by
/// [`Memoizer::cache_calls`](super::Memoizer::cache_calls)
pub struct CachedCall<A, K, V, F> {
    target: F,
    config: DecoratorConfig<A, K>,
    shared: Arc<Shared<K, V>>,
    _args: PhantomData<fn(A)>,
}

wrapper_common!(CachedCall);

impl<A, K, V, F, Fut, E> CachedCall<A, K, V, F>
where
    K: Send + Sync + 'static,
    V: Clone + Send + 'static,
    F: Fn(A) -> Fut,
    Fut: Future<Output = Result<V, E>>,
{
    pub async fn call(&self, args: A) -> Result<V, E> {
        if self.config.should_skip(&args) {
            trace!("Skip condition met, bypassing cache");
            return (self.target)(args).await;
        }

        let key = self.config.key_for(&args);
        match self.shared.cache.get(&key).await {
            Ok(Some(value)) => {
                trace!(provider = self.shared.cache.name(), "Cache hit");
                return Ok(value);
            }
            Ok(None) => {
                trace!(provider = self.shared.cache.name(), "Cache miss");
            }
            Err(e) => {
                self.shared.report(GET_FAILED, &e);
                return (self.target)(args).await;
            }
        }

        let value = (self.target)(args).await?;
        if let Err(e) = self.shared.cache.set(key, value.clone()).await {
            self.shared.report(SET_FAILED, &e);
        }
        Ok(value)
    }
}

// ============================================================================
// EvictingCall (invalidate, then delegate)
// ============================================================================

/// Function that evicts its key before running, built by
/// [`Memoizer::evict_on_call`](super::Memoizer::evict_on_call)
pub struct EvictingCall<A, K, V, F> {
    target: F,
    config: DecoratorConfig<A, K>,
    shared: Arc<Shared<K, V>>,
    _args: PhantomData<fn(A)>,
}

wrapper_common!(EvictingCall);

impl<A, K, V, F, Fut> EvictingCall<A, K, V, F>
where
    K: Send + Sync + 'static,
    V: Send + 'static,
    F: Fn(A) -> Fut,
    Fut: Future,
{
    pub async fn call(&self, args: A) -> Fut::Output {
        if self.config.should_skip(&args) {
            trace!("Skip condition met, not evicting");
            return (self.target)(args).await;
        }

        let key = self.config.key_for(&args);
        match self.shared.cache.remove(&key).await {
            Ok(()) => debug!(provider = self.shared.cache.name(), "Cache entry evicted"),
            Err(e) => self.shared.report(REMOVE_FAILED, &e),
        }

        (self.target)(args).await
    }
}

// ============================================================================
// CachingWriteCall (delegate, then refresh)
// ============================================================================

/// Function whose result replaces the cached value, built by
/// [`Memoizer::add_result_to_cache`](super::Memoizer::add_result_to_cache)
pub struct CachingWriteCall<A, K, V, F> {
    target: F,
    config: DecoratorConfig<A, K>,
    shared: Arc<Shared<K, V>>,
    _args: PhantomData<fn(A)>,
}

wrapper_common!(CachingWriteCall);

impl<A, K, V, F, Fut, E> CachingWriteCall<A, K, V, F>
where
    K: Send + Sync + 'static,
    V: Clone + Send + 'static,
    F: Fn(A) -> Fut,
    Fut: Future<Output = Result<V, E>>,
{
    pub async fn call(&self, args: A) -> Result<V, E> {
        // The target consumes the arguments, so derive everything first
        let key = if self.config.should_skip(&args) {
            None
        } else {
            Some(self.config.key_for(&args))
        };

        let value = (self.target)(args).await?;

        match key {
            Some(key) => {
                if let Err(e) = self.shared.cache.set(key, value.clone()).await {
                    self.shared.report(SET_FAILED, &e);
                } else {
                    debug!(provider = self.shared.cache.name(), "Cache entry refreshed");
                }
            }
            None => trace!("Skip condition met, result not cached"),
        }
        Ok(value)
    }
}

// ============================================================================
// Decorated impls + function-value conversion
// ============================================================================

macro_rules! impl_decorated {
    ($name:ident, [$($bounds:tt)*], $output:ty) => {
        #[async_trait]
        impl<A, K, V, F, Fut, $($bounds)*> Decorated<A> for $name<A, K, V, F>
        where
            A: Send + 'static,
            K: Send + Sync + 'static,
            V: Clone + Send + Sync + 'static,
            F: Fn(A) -> Fut + Send + Sync,
            Fut: Future<Output = $output> + Send,
        {
            type Output = $output;

            async fn call(&self, args: A) -> Self::Output {
                $name::call(self, args).await
            }
        }

        impl<A, K, V, F, Fut, $($bounds)*> $name<A, K, V, F>
        where
            A: Send + 'static,
            K: Send + Sync + 'static,
            V: Clone + Send + Sync + 'static,
            F: Fn(A) -> Fut + Send + Sync + 'static,
            Fut: Future<Output = $output> + Send + 'static,
        {
            /// Turn the wrapper into a plain function value with the
            /// target's argument type.
            pub fn into_fn(
                self,
            ) -> impl Fn(A) -> BoxFuture<'static, $output> + Clone + Send + Sync {
                let this = Arc::new(self);
                move |args: A| {
                    let this = Arc::clone(&this);
                    let fut: BoxFuture<'static, $output> =
                        Box::pin(async move { $name::call(&*this, args).await });
                    fut
                }
            }
        }
    };
}

impl_decorated!(CachedCall, [E: Send + 'static], Result<V, E>);
impl_decorated!(CachingWriteCall, [E: Send + 'static], Result<V, E>);
impl_decorated!(EvictingCall, [R: Send + 'static], R);

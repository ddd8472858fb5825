//! Cache provider contract
//!
//! Every storage backend the decorators can sit on implements
//! [`CacheProvider`]. All four operations are async so that network or disk
//! backed providers fit the same seam as the in-memory one.

mod memory;

use async_trait::async_trait;
use std::sync::Arc;

use crate::Result;

pub use memory::InMemoryCacheProvider;

/// Asynchronous key/value store used by the decorators.
///
/// # Contract
///
/// - `get` returns `Ok(None)` when the key is not stored. Operational
///   failures (backend down, timeout) must be `Err`, never a fake miss.
/// - `set` stores or overwrites. It may evict other entries.
/// - `remove` on an absent key is not an error.
/// - `remove_all` clears every entry.
///
/// Implementations must be safe to share across tasks. No lock may be held
/// by the caller across these calls, so providers synchronize internally.
#[async_trait]
pub trait CacheProvider<K, V>: Send + Sync {
    /// Provider name (for logging)
    fn name(&self) -> &str {
        "cache"
    }

    async fn get(&self, key: &K) -> Result<Option<V>>;

    async fn set(&self, key: K, value: V) -> Result<()>;

    async fn remove(&self, key: &K) -> Result<()>;

    async fn remove_all(&self) -> Result<()>;
}

#[async_trait]
impl<K, V, P> CacheProvider<K, V> for Arc<P>
where
    K: Send + Sync + 'static,
    V: Send + 'static,
    P: CacheProvider<K, V> + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn get(&self, key: &K) -> Result<Option<V>> {
        (**self).get(key).await
    }

    async fn set(&self, key: K, value: V) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &K) -> Result<()> {
        (**self).remove(key).await
    }

    async fn remove_all(&self) -> Result<()> {
        (**self).remove_all().await
    }
}

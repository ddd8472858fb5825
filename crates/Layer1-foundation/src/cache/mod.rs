//! # Cache providers
//!
//! The storage side of memo: the [`CacheProvider`] contract and the
//! reference [`InMemoryCacheProvider`] built on a bounded LRU store.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Decorators (memo-core)                       │
//! │        │ get / set / remove / remove_all      │
//! │        ▼                                      │
//! │  CacheProvider<K, V>  (async trait)           │
//! │   ├── InMemoryCacheProvider (LruStore)        │
//! │   └── custom providers (network, disk, ...)   │
//! └──────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod provider;
pub mod util;

pub use config::InMemoryCacheOptions;
pub use provider::{CacheProvider, InMemoryCacheProvider};
pub use util::{LruStats, LruStore};

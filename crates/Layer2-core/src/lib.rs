//! # memo-core
//!
//! Decorator engine for memo: wraps async data-access functions with
//! read-through caching, eviction and cache write-back, sharing one
//! cache provider and deriving keys from call arguments.
//!
//! ```rust,ignore
//! use memo_core::{DecoratorOptions, Memoizer};
//! use memo_foundation::CacheKey;
//!
//! let memo: Memoizer<CacheKey, Profile> = Memoizer::default();
//! let load = memo.cache_calls(|user: String| fetch_profile(user), DecoratorOptions::new());
//! let save = memo.add_result_to_cache(|user: String| store_profile(user), DecoratorOptions::new());
//!
//! load.call("rick".to_string()).await?; // target runs
//! load.call("rick".to_string()).await?; // served from cache
//! ```

pub mod decorator;

pub use decorator::{
    CachedCall, CachingWriteCall, Decorated, DecoratorConfig, DecoratorOptions, DefaultKey,
    EvictingCall, KeyGenerator, Memoizer, SkipCondition,
};

// Re-export the foundation types callers need alongside the engine
pub use memo_foundation::{
    pick_first_argument, pick_first_argument_field, pick_nth_argument, CacheKey, CacheProvider,
    DiagnosticSink, Error, InMemoryCacheOptions, InMemoryCacheProvider, NoopSink, Result,
    TracingSink,
};

//! # Cache decorators
//!
//! Three ways to put a cache around an async function:
//!
//! | Wrapper               | Cache op         | Target call                |
//! |-----------------------|------------------|----------------------------|
//! | `cache_calls`         | get, set on miss | only on miss or failed get |
//! | `evict_on_call`       | remove           | always, after the remove   |
//! | `add_result_to_cache` | set              | always, before the write   |
//!
//! A skip condition that matches turns any of them into a plain call.
//! Cache failures never reach the caller; they go to the engine's
//! [`DiagnosticSink`](memo_foundation::DiagnosticSink). Errors returned by
//! the target are passed through untouched.
//!
//! Concurrent misses on the same key are not coalesced: both calls run the
//! target and the last write wins.

mod config;
mod engine;
mod wrapped;

pub use config::{DecoratorConfig, DecoratorOptions, DefaultKey, KeyGenerator, SkipCondition};
pub use engine::Memoizer;
pub use wrapped::{CachedCall, CachingWriteCall, Decorated, EvictingCall};

//! # memo-foundation
//!
//! Foundation layer for memo:
//! - Cache: the async [`CacheProvider`] contract and the in-memory LRU provider
//! - Keys: argument-based key derivation ([`CacheKey`], argument pickers)
//! - Diagnostic: sinks that receive absorbed cache failures
//! - Error: the provider error type
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  memo-core decorators                                    │
//! │   ├── key derivation  ──────► keys::pick_*               │
//! │   ├── cache operations ─────► CacheProvider<K, V>        │
//! │   │                            └── InMemoryCacheProvider │
//! │   └── absorbed failures ────► DiagnosticSink             │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod cache;
pub mod diagnostic;
pub mod error;
pub mod keys;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Cache
// ============================================================================
pub use cache::{
    CacheProvider, InMemoryCacheOptions, InMemoryCacheProvider, LruStats, LruStore,
};

// ============================================================================
// Keys
// ============================================================================
pub use keys::{
    argument_list, pick_first_argument, pick_first_argument_field, pick_nth_argument, CacheKey,
};

// ============================================================================
// Diagnostic
// ============================================================================
pub use diagnostic::{DiagnosticSink, NoopSink, TracingSink, GET_FAILED, REMOVE_FAILED, SET_FAILED};

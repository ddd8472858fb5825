//! Cache utilities
//!
//! - `LruStore`: bounded LRU storage with optional age limit

mod lru;

pub use lru::{LruStats, LruStore};

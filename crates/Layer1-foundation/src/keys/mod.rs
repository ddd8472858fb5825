//! Key derivation
//!
//! Pure functions that turn a call's argument list into a [`CacheKey`].
//!
//! An argument list is any `Serialize` value. Tuples are positional lists,
//! `()` is the empty list, and anything else (a `Vec` or `Option` included)
//! is a list holding that single value:
//!
//! ```rust,ignore
//! use memo_foundation::keys::{pick_first_argument, pick_nth_argument, CacheKey};
//!
//! let first = pick_first_argument::<(String, u32)>();
//! assert_eq!(first(&("apple".to_string(), 3)), CacheKey::from("apple"));
//!
//! let third = pick_nth_argument::<(String, u32)>(2);
//! assert_eq!(third(&("apple".to_string(), 3)), CacheKey::Absent);
//! ```

mod key;
mod pick;
mod shape;

pub use key::CacheKey;
pub use pick::{
    argument_list, pick_first_argument, pick_first_argument_field, pick_nth_argument,
};

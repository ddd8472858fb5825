//! Argument pickers
//!
//! None of these functions fail: anything that cannot be resolved becomes
//! [`CacheKey::Absent`].

use serde::Serialize;
use serde_json::Value;

use super::shape::{shape_of, Shape};
use super::CacheKey;

/// Flatten an argument list into positional JSON values.
///
/// Tuples are positional lists and `()` is the empty list. Every other value,
/// including `Vec`, `Option` and tuple structs, is a single argument.
///
/// Returns `None` when the arguments cannot be serialized.
pub fn argument_list<A: Serialize + ?Sized>(args: &A) -> Option<Vec<Value>> {
    let shape = match shape_of(args) {
        Ok(shape) => shape,
        Err(e) => {
            tracing::debug!(error = %e, "Arguments are not serializable, no key derived");
            return None;
        }
    };

    if shape == Shape::Unit {
        return Some(Vec::new());
    }

    match serde_json::to_value(args) {
        Ok(Value::Array(items)) if shape == Shape::Tuple => Some(items),
        Ok(single) => Some(vec![single]),
        Err(e) => {
            tracing::debug!(error = %e, "Arguments are not serializable, no key derived");
            None
        }
    }
}

fn nth_value<A: Serialize + ?Sized>(args: &A, index: usize) -> Option<Value> {
    argument_list(args)?.into_iter().nth(index)
}

/// Key derivation that picks the argument at `index`.
///
/// Lists shorter than `index + 1` yield [`CacheKey::Absent`].
pub fn pick_nth_argument<A>(index: usize) -> impl Fn(&A) -> CacheKey + Clone + Send + Sync
where
    A: Serialize + ?Sized,
{
    move |args: &A| {
        nth_value(args, index)
            .map(CacheKey::from)
            .unwrap_or(CacheKey::Absent)
    }
}

/// Key derivation that picks the first argument.
pub fn pick_first_argument<A>() -> impl Fn(&A) -> CacheKey + Clone + Send + Sync
where
    A: Serialize + ?Sized,
{
    pick_nth_argument::<A>(0)
}

/// Key derivation that reads `field` from the first argument.
///
/// A missing or null first argument, a first argument that is not an
/// object, and a missing field all yield [`CacheKey::Absent`].
pub fn pick_first_argument_field<A>(
    field: impl Into<String>,
) -> impl Fn(&A) -> CacheKey + Clone + Send + Sync
where
    A: Serialize + ?Sized,
{
    let field = field.into();
    move |args: &A| match nth_value(args, 0) {
        Some(Value::Object(map)) => map
            .get(&field)
            .map(CacheKey::from_value)
            .unwrap_or(CacheKey::Absent),
        _ => CacheKey::Absent,
    }
}

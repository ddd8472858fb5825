//! Dynamic cache key

use serde_json::Value;
use std::fmt;

/// A hashable key derived from call arguments.
///
/// Numbers are normalized so that `5`, `5u64` and `5.0` compare equal.
/// Floats with a fractional part, arrays and objects are kept as canonical
/// JSON text (object fields sorted), so structurally equal values produce
/// equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheKey {
    /// No value at the requested position
    Absent,
    Null,
    Bool(bool),
    Int(i64),
    /// Only for values above `i64::MAX`
    UInt(u64),
    Str(String),
    Json(String),
}

impl CacheKey {
    pub fn is_absent(&self) -> bool {
        matches!(self, CacheKey::Absent)
    }

    /// Build a key from a JSON value
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => CacheKey::Null,
            Value::Bool(b) => CacheKey::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    CacheKey::Int(i)
                } else if let Some(u) = n.as_u64() {
                    CacheKey::UInt(u)
                } else {
                    match n.as_f64() {
                        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                            CacheKey::Int(f as i64)
                        }
                        _ => CacheKey::Json(n.to_string()),
                    }
                }
            }
            Value::String(s) => CacheKey::Str(s.clone()),
            Value::Array(_) | Value::Object(_) => {
                let mut out = String::new();
                write_canonical(value, &mut out);
                CacheKey::Json(out)
            }
        }
    }
}

// Object keys are sorted so the text does not depend on map ordering.
fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<_> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                if let Some(v) = map.get(key) {
                    write_canonical(v, out);
                }
            }
            out.push('}');
        }
        other => out.push_str(&other.to_string()),
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Absent => write!(f, "<absent>"),
            CacheKey::Null => write!(f, "null"),
            CacheKey::Bool(b) => write!(f, "{}", b),
            CacheKey::Int(i) => write!(f, "{}", i),
            CacheKey::UInt(u) => write!(f, "{}", u),
            CacheKey::Str(s) => write!(f, "{}", s),
            CacheKey::Json(j) => write!(f, "{}", j),
        }
    }
}

impl From<Value> for CacheKey {
    fn from(value: Value) -> Self {
        CacheKey::from_value(&value)
    }
}

impl From<&Value> for CacheKey {
    fn from(value: &Value) -> Self {
        CacheKey::from_value(value)
    }
}

impl From<&str> for CacheKey {
    fn from(s: &str) -> Self {
        CacheKey::Str(s.to_string())
    }
}

impl From<String> for CacheKey {
    fn from(s: String) -> Self {
        CacheKey::Str(s)
    }
}

impl From<bool> for CacheKey {
    fn from(b: bool) -> Self {
        CacheKey::Bool(b)
    }
}

impl From<u64> for CacheKey {
    fn from(u: u64) -> Self {
        match i64::try_from(u) {
            Ok(i) => CacheKey::Int(i),
            Err(_) => CacheKey::UInt(u),
        }
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(
            impl From<$t> for CacheKey {
                fn from(i: $t) -> Self {
                    CacheKey::Int(i as i64)
                }
            }
        )*
    };
}

impl_from_signed!(i8, i16, i32, i64, u8, u16, u32);

impl From<usize> for CacheKey {
    fn from(u: usize) -> Self {
        CacheKey::from(u as u64)
    }
}

impl<T: Into<CacheKey>> From<Option<T>> for CacheKey {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CacheKey::Absent)
    }
}

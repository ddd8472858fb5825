//! Decorator configuration
//!
//! A [`DecoratorConfig`] is resolved once when a wrapped function is built
//! and never changes afterwards. Partial overrides are expressed as
//! [`DecoratorOptions`] and merged onto explicit defaults with
//! [`DecoratorConfig::merge`].

use memo_foundation::{pick_first_argument, CacheKey};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Derives a cache key from an argument list
pub type KeyGenerator<A, K> = Arc<dyn Fn(&A) -> K + Send + Sync>;

/// Decides whether a call bypasses the cache
pub type SkipCondition<A> = Arc<dyn Fn(&A) -> bool + Send + Sync>;

/// Key types that can be derived from an argument list without a custom
/// key generator.
pub trait DefaultKey<A>: Sized {
    fn default_key_generator() -> KeyGenerator<A, Self>;
}

/// The first argument is the key
impl<A> DefaultKey<A> for CacheKey
where
    A: Serialize + 'static,
{
    fn default_key_generator() -> KeyGenerator<A, Self> {
        Arc::new(pick_first_argument::<A>())
    }
}

fn never_skip<A: 'static>() -> SkipCondition<A> {
    Arc::new(|_: &A| false)
}

// ============================================================================
// DecoratorConfig
// ============================================================================

/// Fully resolved configuration of one wrapped function
pub struct DecoratorConfig<A, K> {
    key_generator: KeyGenerator<A, K>,
    skip_if: SkipCondition<A>,
}

impl<A: 'static, K> DecoratorConfig<A, K> {
    /// Config with a custom key generator that never skips
    pub fn new(key_generator: impl Fn(&A) -> K + Send + Sync + 'static) -> Self {
        Self {
            key_generator: Arc::new(key_generator),
            skip_if: never_skip(),
        }
    }

    /// Replace the skip condition
    pub fn with_skip_if(mut self, skip_if: impl Fn(&A) -> bool + Send + Sync + 'static) -> Self {
        self.skip_if = Arc::new(skip_if);
        self
    }

    /// Build a new config from `defaults` with every option set in
    /// `overrides` taking precedence. Neither input is modified.
    pub fn merge(defaults: &Self, overrides: DecoratorOptions<A, K>) -> Self {
        Self {
            key_generator: overrides
                .key_generator
                .unwrap_or_else(|| Arc::clone(&defaults.key_generator)),
            skip_if: overrides
                .skip_if
                .unwrap_or_else(|| Arc::clone(&defaults.skip_if)),
        }
    }
}

impl<A, K> DecoratorConfig<A, K> {
    pub fn key_for(&self, args: &A) -> K {
        (self.key_generator)(args)
    }

    pub fn should_skip(&self, args: &A) -> bool {
        (self.skip_if)(args)
    }
}

impl<A, K> Default for DecoratorConfig<A, K>
where
    A: 'static,
    K: DefaultKey<A>,
{
    fn default() -> Self {
        Self {
            key_generator: K::default_key_generator(),
            skip_if: never_skip(),
        }
    }
}

impl<A, K> Clone for DecoratorConfig<A, K> {
    fn clone(&self) -> Self {
        Self {
            key_generator: Arc::clone(&self.key_generator),
            skip_if: Arc::clone(&self.skip_if),
        }
    }
}

impl<A, K> fmt::Debug for DecoratorConfig<A, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoratorConfig")
            .field("key_generator", &"<fn>")
            .field("skip_if", &"<fn>")
            .finish()
    }
}

// ============================================================================
// DecoratorOptions
// ============================================================================

/// Partial overrides for a [`DecoratorConfig`]
///
/// ```rust,ignore
/// let options = DecoratorOptions::new()
///     .key_generator(|name: &String| CacheKey::from(name.to_uppercase()))
///     .skip_if(|name: &String| name.is_empty());
/// ```
pub struct DecoratorOptions<A, K> {
    key_generator: Option<KeyGenerator<A, K>>,
    skip_if: Option<SkipCondition<A>>,
}

impl<A, K> DecoratorOptions<A, K> {
    pub fn new() -> Self {
        Self {
            key_generator: None,
            skip_if: None,
        }
    }

    pub fn key_generator(mut self, f: impl Fn(&A) -> K + Send + Sync + 'static) -> Self {
        self.key_generator = Some(Arc::new(f));
        self
    }

    pub fn skip_if(mut self, f: impl Fn(&A) -> bool + Send + Sync + 'static) -> Self {
        self.skip_if = Some(Arc::new(f));
        self
    }
}

impl<A, K> Default for DecoratorOptions<A, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, K> From<DecoratorOptions<A, K>> for DecoratorConfig<A, K>
where
    A: 'static,
    K: DefaultKey<A>,
{
    fn from(options: DecoratorOptions<A, K>) -> Self {
        DecoratorConfig::merge(&DecoratorConfig::default(), options)
    }
}

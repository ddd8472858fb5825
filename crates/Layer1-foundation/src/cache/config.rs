//! In-memory provider configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{Error, Result};

/// Options for [`InMemoryCacheProvider`](super::InMemoryCacheProvider)
///
/// Every field is optional on the wire, so `{}` is a valid (unbounded,
/// never expiring) configuration:
///
/// ```json
/// { "max": 500, "maxAgeMs": 60000, "updateAgeOnGet": true }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InMemoryCacheOptions {
    /// Maximum number of entries (None or 0 = unbounded)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,

    /// Maximum entry age in milliseconds (None or 0 = entries never expire)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age_ms: Option<u64>,

    /// Hand out an expired value once while deleting it
    #[serde(default)]
    pub stale: bool,

    /// A hit resets the entry's age
    #[serde(default)]
    pub update_age_on_get: bool,
}

impl InMemoryCacheOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Reject combinations that cannot take effect
    pub fn validate(&self) -> Result<()> {
        if self.stale && self.max_age().is_none() {
            return Err(Error::Config("stale requires maxAgeMs".to_string()));
        }
        Ok(())
    }

    /// Effective capacity (zero counts as unbounded)
    pub fn capacity(&self) -> Option<usize> {
        self.max.filter(|max| *max > 0)
    }

    /// Effective age limit (zero counts as no expiry)
    pub fn max_age(&self) -> Option<Duration> {
        self.max_age_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    /// Overlay the fields set in `other`
    pub fn merge(&mut self, other: InMemoryCacheOptions) {
        if other.max.is_some() {
            self.max = other.max;
        }
        if other.max_age_ms.is_some() {
            self.max_age_ms = other.max_age_ms;
        }
        self.stale |= other.stale;
        self.update_age_on_get |= other.update_age_on_get;
    }

    // ========================================================================
    // Builder
    // ========================================================================

    pub fn with_max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    /// Set the age limit, rounded up to whole milliseconds.
    ///
    /// `Duration::ZERO` disables expiry.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        let ms = max_age.as_nanos().div_ceil(1_000_000);
        self.max_age_ms = Some(u64::try_from(ms).unwrap_or(u64::MAX));
        self
    }

    pub fn with_stale(mut self, stale: bool) -> Self {
        self.stale = stale;
        self
    }

    pub fn with_update_age_on_get(mut self, update: bool) -> Self {
        self.update_age_on_get = update;
        self
    }
}

//! Error types for memo
//!
//! Every cache provider reports operational failures through [`Error`].
//! A missing entry is never an error: providers return `Ok(None)` for it.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Cache operation error
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Backend
    // ========================================================================
    #[error("Cache backend unavailable: {0}")]
    Unavailable(String),

    #[error("Cache backend error: {provider} - {message}")]
    Backend { provider: String, message: String },

    #[error("Timeout: {0}")]
    Timeout(String),

    // ========================================================================
    // Configuration
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // External conversions
    // ========================================================================
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Whether retrying the same operation later may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Unavailable(_) | Error::Timeout(_))
    }

    /// Backend failure helper
    pub fn backend(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Backend {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(Error::Unavailable("redis down".into()).is_transient());
        assert!(Error::Timeout("get".into()).is_transient());
        assert!(!Error::backend("redis", "WRONGTYPE").is_transient());
        assert!(!Error::Config("max".into()).is_transient());
    }

    #[test]
    fn test_display() {
        let err = Error::backend("redis", "connection reset");
        assert_eq!(err.to_string(), "Cache backend error: redis - connection reset");

        let err: Error = anyhow::anyhow!("socket closed").into();
        assert_eq!(err.to_string(), "socket closed");
    }
}

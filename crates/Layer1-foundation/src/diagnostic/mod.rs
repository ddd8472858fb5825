//! Diagnostic sink
//!
//! Cache failures are absorbed by the decorators and reported here instead
//! of being returned to the caller. A sink only observes; whatever it does,
//! the outcome of the wrapped call stays the same.

use crate::Error;

/// Reported when a cache read fails and the target is called directly
pub const GET_FAILED: &str = "Could not get value from cache";

/// Reported when evicting an entry fails
pub const REMOVE_FAILED: &str = "Could not remove log entry";

/// Reported when writing a result to the cache fails
pub const SET_FAILED: &str = "Could not add value to cache";

/// Receiver for non-fatal cache failures
pub trait DiagnosticSink: Send + Sync {
    fn error(&self, message: &str, cause: &Error);
}

/// Drops every report
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn error(&self, _message: &str, _cause: &Error) {}
}

/// Forwards reports to `tracing` at warn level
#[derive(Debug, Clone, Default)]
pub struct TracingSink {
    target: Option<String>,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag every report with a component name
    pub fn with_component(component: impl Into<String>) -> Self {
        Self {
            target: Some(component.into()),
        }
    }
}

impl DiagnosticSink for TracingSink {
    fn error(&self, message: &str, cause: &Error) {
        match &self.target {
            Some(component) => tracing::warn!(component = %component, error = %cause, "{}", message),
            None => tracing::warn!(error = %cause, "{}", message),
        }
    }
}

impl<F> DiagnosticSink for F
where
    F: Fn(&str, &Error) + Send + Sync,
{
    fn error(&self, message: &str, cause: &Error) {
        self(message, cause)
    }
}

//! Diagnostics sink for a session
//!
//! Warnings (auto-derived seeds, inference fallbacks), verbose traces and
//! recorded failures go through a [`SessionObserver`] instead of straight to
//! stderr, so the host test suite decides formatting and destination.

use crate::assertions::FailedAssertion;
use log::{debug, warn};

/// Receives a session's diagnostics
pub trait SessionObserver: Send + Sync {
    /// Something the author should know about (e.g. an unset seed)
    fn warn(&self, message: &str);

    /// Verbose-mode progress (stage and iteration traces)
    fn trace(&self, message: &str);

    /// A failure was appended to the session's log
    fn failure(&self, failure: &FailedAssertion) {
        self.warn(&failure.to_string());
    }
}

/// Forwards diagnostics to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl SessionObserver for LogObserver {
    fn warn(&self, message: &str) {
        warn!("{}", message);
    }

    fn trace(&self, message: &str) {
        debug!("{}", message);
    }

    fn failure(&self, failure: &FailedAssertion) {
        warn!("Assertion failed: {}", failure);
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl SessionObserver for SilentObserver {
    fn warn(&self, _message: &str) {}

    fn trace(&self, _message: &str) {}

    fn failure(&self, _failure: &FailedAssertion) {}
}

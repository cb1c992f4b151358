//! Append-only log of failed assertions.

use crate::value::Value;
use serde::Serialize;
use std::fmt;

/// One recorded mismatch or stage failure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedAssertion {
    /// Observed value (`Undefined` for stage failures)
    pub actual: Value,
    /// Expected value (`Undefined` for stage failures)
    pub expected: Value,
    /// Session seed, for replay
    pub seed: u64,
    /// Human-readable description
    pub message: String,
    /// Zero-based iteration of a repeated assertion, if any
    pub iteration: Option<usize>,
}

impl FailedAssertion {
    pub fn new(actual: Value, expected: Value, seed: u64, message: impl Into<String>) -> Self {
        Self {
            actual,
            expected,
            seed,
            message: message.into(),
            iteration: None,
        }
    }

    /// A stage whose action failed or whose dependencies could not be resolved
    pub fn stage(stage: &str, seed: u64, error: impl fmt::Display) -> Self {
        Self::new(
            Value::Undefined,
            Value::Undefined,
            seed,
            format!("Stage '{}' failed: {}", stage, error),
        )
    }

    pub fn at_iteration(mut self, iteration: usize) -> Self {
        self.iteration = Some(iteration);
        self
    }
}

impl fmt::Display for FailedAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(iteration) = self.iteration {
            write!(f, "[iteration {}] ", iteration)?;
        }
        write!(
            f,
            "{} (expected {}, actual {}, seed 0x{:016x})",
            self.message, self.expected, self.actual, self.seed
        )
    }
}

/// Failures recorded during a session; entries are never removed
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct FailureLog {
    entries: Vec<FailedAssertion>,
}

impl FailureLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, failure: FailedAssertion) {
        self.entries.push(failure);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[FailedAssertion] {
        &self.entries
    }

    /// Entries appended after the log had `mark` entries
    pub fn since(&self, mark: usize) -> &[FailedAssertion] {
        self.entries.get(mark..).unwrap_or(&[])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FailedAssertion> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a FailureLog {
    type Item = &'a FailedAssertion;
    type IntoIter = std::slice::Iter<'a, FailedAssertion>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

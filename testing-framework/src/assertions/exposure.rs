//! Exposed runtime values.

use crate::value::Value;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Shared name -> last written value registry
///
/// Cloning yields another handle to the same registry, so stage actions can
/// capture a handle and expose what the system under test produced while
/// the session keeps reading from its own.
///
/// ```rust
/// use seeded_testing_framework::assertions::Exposures;
/// use seeded_testing_framework::Value;
///
/// let exposures = Exposures::new();
/// let handle = exposures.clone();
/// handle.expose("x", "n");
/// handle.expose("y", "n");
/// assert_eq!(exposures.get("n"), Some(Value::from("y")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Exposures {
    inner: Arc<Mutex<IndexMap<String, Value>>>,
}

impl Exposures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` under `name`; the last write wins
    pub fn expose(&self, value: impl Into<Value>, name: impl Into<String>) {
        self.inner.lock().insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.inner.lock().get(name).cloned()
    }

    pub fn remove(&self, name: &str) -> Option<Value> {
        self.inner.lock().shift_remove(name)
    }

}

//! What an exposed value is compared against.

use super::PreparedFunction;
use crate::value::Value;

/// Expected side of an `assert_exposed` call
///
/// ```rust
/// use seeded_testing_framework::assertions::Expectation;
/// use seeded_testing_framework::Value;
///
/// assert!(matches!(Expectation::from("n"), Expectation::Literal(Value::Str(_))));
/// assert!(matches!(
///     Expectation::from_parts("status", true),
///     Expectation::Fixture(name) if name == "status"
/// ));
/// ```
#[derive(Debug, Clone)]
pub enum Expectation {
    /// Compared as is
    Literal(Value),
    /// Name of a fixture, read without regeneration
    Fixture(String),
    /// Executed on every iteration
    Prepared(PreparedFunction),
}

impl Expectation {
    /// Literal, or a fixture reference when `is_inner_value` is set
    ///
    /// A fixture reference needs a string name; any other value stays literal.
    pub fn from_parts(value: impl Into<Value>, is_inner_value: bool) -> Self {
        match value.into() {
            Value::Str(name) if is_inner_value => Expectation::Fixture(name),
            value => Expectation::Literal(value),
        }
    }

    pub fn fixture(name: impl Into<String>) -> Self {
        Expectation::Fixture(name.into())
    }
}

impl From<Value> for Expectation {
    fn from(value: Value) -> Self {
        Expectation::Literal(value)
    }
}

impl From<&str> for Expectation {
    fn from(value: &str) -> Self {
        Expectation::Literal(Value::from(value))
    }
}

impl From<String> for Expectation {
    fn from(value: String) -> Self {
        Expectation::Literal(Value::Str(value))
    }
}

impl From<i64> for Expectation {
    fn from(value: i64) -> Self {
        Expectation::Literal(Value::Int(value))
    }
}

impl From<f64> for Expectation {
    fn from(value: f64) -> Self {
        Expectation::Literal(Value::Float(value))
    }
}

impl From<bool> for Expectation {
    fn from(value: bool) -> Self {
        Expectation::Literal(Value::Bool(value))
    }
}

impl From<PreparedFunction> for Expectation {
    fn from(function: PreparedFunction) -> Self {
        Expectation::Prepared(function)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_value_needs_a_name() {
        assert!(matches!(
            Expectation::from_parts(404i64, true),
            Expectation::Literal(Value::Int(404))
        ));
        assert!(matches!(
            Expectation::from_parts("status", false),
            Expectation::Literal(_)
        ));
    }
}

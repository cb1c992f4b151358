//! Assertion variables and boolean-branch descriptors.

use super::PreparedFunction;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

type BranchCheck = Arc<dyn Fn() -> bool + Send + Sync>;

/// Expectation callbacks for each outcome of a boolean variable
///
/// Each callback answers "did the system behave as expected, given that the
/// variable evaluated to this branch?".
#[derive(Clone)]
pub struct BooleanBranchDescriptor {
    if_true: BranchCheck,
    if_false: BranchCheck,
}

impl BooleanBranchDescriptor {
    pub fn new<T, F>(if_true: T, if_false: F) -> Self
    where
        T: Fn() -> bool + Send + Sync + 'static,
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self {
            if_true: Arc::new(if_true),
            if_false: Arc::new(if_false),
        }
    }

    /// Run the check for the branch that was taken
    pub fn check(&self, outcome: bool) -> bool {
        if outcome {
            (self.if_true)()
        } else {
            (self.if_false)()
        }
    }
}

impl fmt::Debug for BooleanBranchDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BooleanBranchDescriptor")
    }
}

/// Describes how an assertion variable's outcome is judged
#[derive(Debug, Clone)]
pub enum VariableDescriptor {
    BooleanBranch(BooleanBranchDescriptor),
}

impl VariableDescriptor {
    /// Whether the taken branch met its expectation
    pub fn check(&self, outcome: bool) -> bool {
        match self {
            VariableDescriptor::BooleanBranch(branch) => branch.check(outcome),
        }
    }
}

impl From<BooleanBranchDescriptor> for VariableDescriptor {
    fn from(branch: BooleanBranchDescriptor) -> Self {
        VariableDescriptor::BooleanBranch(branch)
    }
}

/// Where an assertion variable's value comes from
#[derive(Debug, Clone)]
pub enum VariableSource {
    Literal(Value),
    Prepared(PreparedFunction),
}

impl From<Value> for VariableSource {
    fn from(value: Value) -> Self {
        VariableSource::Literal(value)
    }
}

impl From<bool> for VariableSource {
    fn from(value: bool) -> Self {
        VariableSource::Literal(Value::Bool(value))
    }
}

impl From<PreparedFunction> for VariableSource {
    fn from(function: PreparedFunction) -> Self {
        VariableSource::Prepared(function)
    }
}

/// A named value evaluated to a boolean outcome by `assert_automated_variable`
#[derive(Debug, Clone)]
pub struct AssertionVariable {
    name: String,
    source: VariableSource,
    descriptor: Option<VariableDescriptor>,
}

impl AssertionVariable {
    pub fn new(name: impl Into<String>, source: impl Into<VariableSource>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            descriptor: None,
        }
    }

    pub fn with_descriptor(mut self, descriptor: impl Into<VariableDescriptor>) -> Self {
        self.descriptor = Some(descriptor.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &VariableSource {
        &self.source
    }

    pub fn descriptor(&self) -> Option<&VariableDescriptor> {
        self.descriptor.as_ref()
    }

    pub fn set_descriptor(&mut self, descriptor: impl Into<VariableDescriptor>) {
        self.descriptor = Some(descriptor.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_dispatch() {
        let descriptor: VariableDescriptor = BooleanBranchDescriptor::new(|| true, || false).into();
        assert!(descriptor.check(true));
        assert!(!descriptor.check(false));
    }

    #[test]
    fn test_variable_descriptor_is_optional() {
        let mut variable = AssertionVariable::new("flag", true);
        assert!(variable.descriptor().is_none());
        variable.set_descriptor(BooleanBranchDescriptor::new(|| true, || true));
        assert!(variable.descriptor().is_some());
        assert_eq!(variable.name(), "flag");
    }
}

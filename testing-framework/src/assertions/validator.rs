//! Comparison policy for exposed values.

use crate::value::Value;
use serde::{Deserialize, Serialize};

/// How an expected value is compared with an exposed one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Structural equality
    #[default]
    MatchExactly,
    /// The exposed value contains the expected one (substring, element, sub-map)
    IncludeValue,
    /// Structural equality through nested lists and maps
    DeepMatchExactly,
    /// The expectation is a check whose truthiness decides the outcome
    EvaluateFunction,
}

/// Holds the active match policy and the fixture key under test
#[derive(Debug, Clone, Default)]
pub struct Validator {
    policy: MatchPolicy,
    selected_key: Option<String>,
}

impl Validator {
    pub fn new(policy: MatchPolicy) -> Self {
        Self {
            policy,
            selected_key: None,
        }
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: MatchPolicy) -> &mut Self {
        self.policy = policy;
        self
    }

    pub fn expect_to_match_exact(&mut self) -> &mut Self {
        self.set_policy(MatchPolicy::MatchExactly)
    }

    pub fn expect_to_include(&mut self) -> &mut Self {
        self.set_policy(MatchPolicy::IncludeValue)
    }

    pub fn expect_to_deep_match(&mut self) -> &mut Self {
        self.set_policy(MatchPolicy::DeepMatchExactly)
    }

    pub fn expect_function_to_hold(&mut self) -> &mut Self {
        self.set_policy(MatchPolicy::EvaluateFunction)
    }

    /// Fixture key chosen with `param_to_test`
    pub fn selected_key(&self) -> Option<&str> {
        self.selected_key.as_deref()
    }

    pub(crate) fn select(&mut self, key: &str) {
        self.selected_key = Some(key.to_string());
    }

    /// Whether `actual` satisfies `expected` under the active policy
    ///
    /// Under `EvaluateFunction`, `expected` is the result of the check and
    /// `actual` is ignored.
    pub fn matches(&self, actual: &Value, expected: &Value) -> bool {
        match self.policy {
            MatchPolicy::MatchExactly | MatchPolicy::DeepMatchExactly => actual == expected,
            MatchPolicy::IncludeValue => actual.includes(expected),
            MatchPolicy::EvaluateFunction => expected.is_truthy(),
        }
    }
}

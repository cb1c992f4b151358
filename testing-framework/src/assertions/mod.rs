//! Assertion engine
//!
//! Values observed while the stages run are exposed under a name, then
//! compared against an [`Expectation`] by a [`Validator`]. Mismatches are
//! recorded in a [`FailureLog`] rather than aborting the test, so one run
//! reports every failing iteration together with the seed that produced it.

mod expectation;
mod exposure;
mod failure;
mod prepared;
mod validator;
mod variable;

pub use expectation::Expectation;
pub use exposure::Exposures;
pub use failure::{FailedAssertion, FailureLog};
pub use prepared::PreparedFunction;
pub use validator::{MatchPolicy, Validator};
pub use variable::{AssertionVariable, BooleanBranchDescriptor, VariableDescriptor, VariableSource};

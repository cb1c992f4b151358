//! Convenient re-exports for writing fixture tests
//!
//! ```rust
//! use seeded_testing_framework::prelude::*;
//! ```

pub use crate::assertions::{
    AssertionVariable, BooleanBranchDescriptor, Expectation, Exposures, FailedAssertion,
    MatchPolicy, PreparedFunction, Validator, VariableDescriptor, VariableSource,
};
pub use crate::config::SessionConfig;
pub use crate::error::{GeneratorError, PropsError, SessionError, StagingError};
pub use crate::fixtures::{FixtureSlot, NestedFixture};
pub use crate::generators::{
    BooleanGenerator, CharClass, Generator, RangeGenerator, StringGenerator, StringLength,
    ValueGenerator,
};
pub use crate::observer::{LogObserver, SessionObserver, SilentObserver};
pub use crate::orchestrator::{SeedProvider, TestRng};
pub use crate::report::SessionReport;
pub use crate::session::TestSession;
pub use crate::stages::Stage;
pub use crate::value::Value;

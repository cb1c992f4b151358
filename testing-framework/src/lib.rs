//! # Seeded Testing Framework
//!
//! Reproducible fixture generation and staged assertions.
//!
//! ## Architecture Overview
//!
//! - **Generators**: bounded ranges, character-class or pool strings and
//!   booleans, each occasionally yielding edge values (`null`, `undefined`,
//!   `NaN`, empty containers)
//! - **Fixtures**: named generators with one level of nesting, declared by
//!   hand or inferred from a JSON sample
//! - **Stages**: ordered setup and execution steps fed with freshly
//!   generated fixture values
//! - **Assertions**: exposed runtime values checked against literal,
//!   fixture or function expectations over many iterations
//!
//! Every random draw goes through one seeded RNG. A session without an
//! explicit seed picks one, reads `FIXTURE_TEST_SEED` first, and warns how
//! to replay the run.
//!
//! ## Quick Start
//!
//! ```rust
//! use seeded_testing_framework::prelude::*;
//!
//! let mut session = TestSession::new(SessionConfig::with_seed(7));
//! session.set_property("error", StringGenerator::from_pool(["String", "Goes", "Vroom"]));
//! session.set_property("status", RangeGenerator::integer(400, 599).unwrap());
//!
//! let exposures = session.exposures();
//! session
//!     .set_staging(
//!         Stage::new("handle error", move |args| {
//!             exposures.expose(format!("{}: {}", args[1], args[0]), "log line");
//!             Ok(())
//!         })
//!         .with_dependencies(["error", "status"]),
//!         false,
//!     )
//!     .unwrap();
//!
//! session.set_validation_rules(MatchPolicy::IncludeValue);
//! assert!(session.assert_exposed("log line", Expectation::fixture("error"), 20));
//! ```

#![warn(clippy::all)]

/// Seeded randomness shared by every generator
pub mod orchestrator;

pub mod assertions;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod generators;
pub mod observer;
pub mod report;
pub mod session;
pub mod stages;
pub mod value;

// Convenient re-exports for common usage
pub mod prelude;

pub use config::SessionConfig;
pub use orchestrator::TestRng;
pub use session::TestSession;
pub use value::Value;

/// Framework version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

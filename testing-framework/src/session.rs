//! Test session: the public façade over fixtures, stages and assertions
//!
//! A [`TestSession`] owns one seeded RNG and every store. Fixtures are
//! declared with [`set_property`](TestSession::set_property), stages with
//! [`set_staging`](TestSession::set_staging), and runtime observations are
//! exposed by name (usually from inside a stage, through the handle returned
//! by [`exposures`](TestSession::exposures)). Each call to
//! [`assert_exposed`](TestSession::assert_exposed) runs the pipeline, resolves
//! the expectation and compares, recording mismatches instead of panicking.
//!
//! ```rust
//! use seeded_testing_framework::prelude::*;
//!
//! let mut session = TestSession::new(SessionConfig::with_seed(42));
//! session.set_property("status", RangeGenerator::integer(200, 299).unwrap());
//!
//! let exposures = session.exposures();
//! session
//!     .set_staging(
//!         Stage::new("call handler", move |args| {
//!             // a handler that echoes the status it was given
//!             exposures.expose(args[0].clone(), "response.status");
//!             Ok(())
//!         })
//!         .with_dependencies(["status"]),
//!         false,
//!     )
//!     .unwrap();
//!
//! let echoed = session.assert_exposed("response.status", Expectation::fixture("status"), 10);
//! assert!(echoed);
//! assert!(!session.has_failures());
//! ```

use crate::assertions::{
    AssertionVariable, Expectation, Exposures, FailedAssertion, FailureLog, MatchPolicy,
    PreparedFunction, Validator, VariableDescriptor, VariableSource,
};
use crate::config::SessionConfig;
use crate::error::{SessionError, StagingError};
use crate::fixtures::{FixtureSlot, FixtureStore, NestedFixture};
use crate::generators::Generator;
use crate::observer::{LogObserver, SessionObserver};
use crate::orchestrator::{SeedSource, TestRng};
use crate::report::SessionReport;
use crate::stages::{catching, Stage, StageContext, StageRegistry};
use crate::value::Value;
use indexmap::IndexMap;
use std::sync::Arc;

/// Seeded fixture generator and staged assertion engine
pub struct TestSession {
    config: SessionConfig,
    rng: TestRng,
    seed_source: SeedSource,
    fixtures: FixtureStore,
    stages: StageRegistry,
    exposures: Exposures,
    validator: Option<Validator>,
    variables: IndexMap<String, AssertionVariable>,
    failures: FailureLog,
    observer: Arc<dyn SessionObserver>,
}

impl TestSession {
    /// Session reporting through the `log` facade
    pub fn new(config: SessionConfig) -> Self {
        Self::with_observer(config, Arc::new(LogObserver))
    }

    /// Session reporting through a custom observer
    pub fn with_observer(config: SessionConfig, observer: Arc<dyn SessionObserver>) -> Self {
        let (rng, seed_source) = TestRng::resolve(config.seed);
        match seed_source {
            SeedSource::Configured => {}
            SeedSource::Environment => observer.warn(&format!(
                "Using seed 0x{:016x} from {}",
                rng.seed(),
                TestRng::SEED_ENV_VAR
            )),
            SeedSource::Random => observer.warn(&format!(
                "No seed configured, using random seed 0x{:016x}. Replay with {}=0x{:016x}",
                rng.seed(),
                TestRng::SEED_ENV_VAR,
                rng.seed()
            )),
        }

        Self {
            config,
            rng,
            seed_source,
            fixtures: FixtureStore::new(),
            stages: StageRegistry::new(),
            exposures: Exposures::new(),
            validator: None,
            variables: IndexMap::new(),
            failures: FailureLog::new(),
            observer,
        }
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn seed_source(&self) -> SeedSource {
        self.seed_source
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // ---- fixtures -------------------------------------------------------

    /// Declare (or replace) a fixture backed by `generator`
    pub fn set_property(&mut self, name: impl Into<String>, generator: impl Into<Generator>) {
        self.fixtures.set_property(name, generator);
    }

    /// Declare (or replace) a one-level nested fixture
    pub fn set_nested_property(&mut self, name: impl Into<String>, nested: NestedFixture) {
        self.fixtures.set_nested(name, nested);
    }

    /// Infer fixtures from a JSON object sample, at the root or under `as_name`
    ///
    /// Returns false (and warns) when the sample is not an object.
    pub fn infer_and_create_inner(&mut self, sample: &serde_json::Value, as_name: Option<&str>) -> bool {
        let Some(fallbacks) = self.fixtures.infer_and_create_inner(sample, as_name) else {
            self.observer.warn(&format!(
                "Cannot infer fixtures from a {} sample, expected an object",
                Value::from(sample).type_name()
            ));
            return false;
        };
        if self.config.verbose {
            for field in &fallbacks {
                self.observer.warn(&format!(
                    "Field '{}' has no matching generator, falling back to a string generator",
                    field
                ));
            }
        }
        true
    }

    /// Resolve `name` or `container.field` to a plain value
    pub fn get_inner_actual(&mut self, name: &str, regenerate: bool) -> Result<Value, SessionError> {
        self.fixtures.get_inner_actual(name, regenerate, &self.rng)
    }

    /// Materialize every fixture `count` times, regenerating each time
    pub fn generate_objects(&mut self, count: usize) -> Result<Vec<Value>, SessionError> {
        Ok(self.fixtures.generate_objects(count, &self.rng)?)
    }

    pub fn remove_property(&mut self, name: &str) -> Option<FixtureSlot> {
        self.fixtures.remove(name)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.fixtures.contains(name)
    }

    pub fn fixtures(&self) -> &FixtureStore {
        &self.fixtures
    }

    // ---- stages ---------------------------------------------------------

    /// Register a stage; see [`StageRegistry::insert`] for clash rules
    pub fn set_staging(&mut self, stage: Stage, override_existing: bool) -> Result<(), StagingError> {
        self.stages.insert(stage, override_existing)
    }

    pub fn remove_stage(&mut self, name: &str) -> Result<Stage, StagingError> {
        self.stages.remove(name)
    }

    pub fn stage(&self, name: &str) -> Option<&Stage> {
        self.stages.get(name)
    }

    /// Stage registry and the session state a run borrows, split apart
    fn pipeline(&mut self) -> (&mut StageRegistry, StageContext<'_>) {
        let Self {
            config,
            rng,
            fixtures,
            stages,
            failures,
            observer,
            ..
        } = self;
        let ctx = StageContext {
            fixtures,
            rng: &*rng,
            failures,
            observer: &**observer,
            verbose: config.verbose,
        };
        (stages, ctx)
    }

    /// Run every stage in order; failures are recorded, never raised
    pub fn run_staging(&mut self) {
        let (stages, mut ctx) = self.pipeline();
        stages.run_all(&mut ctx);
    }

    /// Run every stage in order, awaiting each one
    pub async fn run_staging_async(&mut self) {
        let (stages, mut ctx) = self.pipeline();
        stages.run_all_async(&mut ctx).await;
    }

    pub fn run_stage(&mut self, name: &str) -> Result<(), StagingError> {
        let (stages, mut ctx) = self.pipeline();
        stages.run_one(name, &mut ctx)
    }

    pub async fn run_stage_async(&mut self, name: &str) -> Result<(), StagingError> {
        let (stages, mut ctx) = self.pipeline();
        stages.run_one_async(name, &mut ctx).await
    }

    /// Run one stage with an explicit fixture list instead of its dependencies
    pub fn run_stage_with(
        &mut self,
        name: &str,
        regenerate: bool,
        fixtures: &[&str],
    ) -> Result<(), StagingError> {
        let names: Vec<String> = fixtures.iter().map(|s| s.to_string()).collect();
        let (stages, mut ctx) = self.pipeline();
        stages.run_one_with(name, regenerate, &names, &mut ctx)
    }

    // ---- exposed values -------------------------------------------------

    /// Record a runtime value under `name`, replacing any previous one
    pub fn expose(&self, value: impl Into<Value>, name: impl Into<String>) {
        self.exposures.expose(value, name);
    }

    /// Shared handle for exposing values from inside stage actions
    pub fn exposures(&self) -> Exposures {
        self.exposures.clone()
    }

    /// Last value exposed under `name`, or `Undefined`
    pub fn exposed(&self, name: &str) -> Value {
        self.exposures.get(name).unwrap_or_default()
    }

    pub fn remove_exposed(&self, name: &str) -> Option<Value> {
        self.exposures.remove(name)
    }

    // ---- validation -----------------------------------------------------

    /// Select the fixture under test and return the validator for configuration
    pub fn param_to_test(&mut self, key: &str) -> Result<&mut Validator, SessionError> {
        if !self.fixtures.contains(key) {
            return Err(SessionError::Key(key.to_string()));
        }
        let validator = self.validator.get_or_insert_with(Validator::default);
        validator.select(key);
        Ok(validator)
    }

    pub fn set_validation_rules(&mut self, policy: MatchPolicy) {
        self.validator
            .get_or_insert_with(Validator::default)
            .set_policy(policy);
    }

    pub fn validator(&self) -> Option<&Validator> {
        self.validator.as_ref()
    }

    fn active_validator(&mut self) -> Validator {
        self.validator.get_or_insert_with(Validator::default).clone()
    }

    // ---- assertions -----------------------------------------------------

    /// Run the pipeline and compare the exposed value, `repeat_count` times
    ///
    /// Returns true iff nothing (mismatch or stage failure) was recorded
    /// during the call. A `repeat_count` of zero runs once.
    pub fn assert_exposed(
        &mut self,
        exposed_name: &str,
        expected: impl Into<Expectation>,
        repeat_count: usize,
    ) -> bool {
        let expected = expected.into();
        let validator = self.active_validator();
        let mark = self.failures.len();

        for iteration in 0..repeat_count.max(1) {
            self.trace(|| format!("Asserting '{}', iteration {}", exposed_name, iteration));
            self.run_staging();

            let resolved = match &expected {
                Expectation::Literal(value) => Ok(value.clone()),
                Expectation::Fixture(name) => self.expected_fixture(name),
                Expectation::Prepared(function) => self
                    .prepared_args(function, exposed_name, validator.policy())
                    .and_then(|args| function.execute_with(&args).map_err(|e| format!("{:#}", e))),
            };
            // read after resolving, a prepared function may expose as a side effect
            let actual = self.exposed(exposed_name);
            self.compare(exposed_name, &validator, actual, resolved, iteration);
        }

        self.failures.since(mark).is_empty()
    }

    /// [`assert_exposed`](Self::assert_exposed), awaiting stages and prepared functions
    pub async fn assert_exposed_async(
        &mut self,
        exposed_name: &str,
        expected: impl Into<Expectation>,
        repeat_count: usize,
    ) -> bool {
        let expected = expected.into();
        let validator = self.active_validator();
        let mark = self.failures.len();

        for iteration in 0..repeat_count.max(1) {
            self.trace(|| format!("Asserting '{}', iteration {}", exposed_name, iteration));
            self.run_staging_async().await;

            let resolved = match &expected {
                Expectation::Literal(value) => Ok(value.clone()),
                Expectation::Fixture(name) => self.expected_fixture(name),
                Expectation::Prepared(function) => {
                    match self.prepared_args(function, exposed_name, validator.policy()) {
                        Ok(args) => function
                            .execute_with_async(args)
                            .await
                            .map_err(|e| format!("{:#}", e)),
                        Err(reason) => Err(reason),
                    }
                }
            };
            let actual = self.exposed(exposed_name);
            self.compare(exposed_name, &validator, actual, resolved, iteration);
        }

        self.failures.since(mark).is_empty()
    }

    fn expected_fixture(&mut self, name: &str) -> Result<Value, String> {
        self.fixtures
            .get_inner_actual(name, false, &self.rng)
            .map_err(|e| e.to_string())
    }

    /// Prepared-function arguments; checks receive the exposed value first
    fn prepared_args(
        &mut self,
        function: &PreparedFunction,
        exposed_name: &str,
        policy: MatchPolicy,
    ) -> Result<Vec<Value>, String> {
        let mut args = function
            .resolve_args(&mut self.fixtures, &self.rng)
            .map_err(|e| e.to_string())?;
        if policy == MatchPolicy::EvaluateFunction {
            args.insert(0, self.exposed(exposed_name));
        }
        Ok(args)
    }

    fn compare(
        &mut self,
        exposed_name: &str,
        validator: &Validator,
        actual: Value,
        resolved: Result<Value, String>,
        iteration: usize,
    ) {
        let seed = self.seed();
        let failure = match resolved {
            Ok(expected) if validator.matches(&actual, &expected) => {
                self.trace(|| format!("'{}' passed at iteration {}", exposed_name, iteration));
                return;
            }
            Ok(expected) => FailedAssertion::new(
                actual,
                expected,
                seed,
                format!(
                    "Exposed value '{}' failed the {:?} check",
                    exposed_name,
                    validator.policy()
                ),
            ),
            Err(reason) => FailedAssertion::new(
                actual,
                Value::Undefined,
                seed,
                format!("Could not resolve the expectation for '{}': {}", exposed_name, reason),
            ),
        };
        self.record(failure.at_iteration(iteration));
    }

    // ---- assertion variables -------------------------------------------

    /// Register (or replace) an assertion variable
    pub fn set_assertion_variable(&mut self, variable: AssertionVariable) {
        self.variables.insert(variable.name().to_string(), variable);
    }

    pub fn set_descriptor_for_variable(
        &mut self,
        name: &str,
        descriptor: impl Into<VariableDescriptor>,
    ) -> Result<(), SessionError> {
        self.variables
            .get_mut(name)
            .ok_or_else(|| SessionError::Key(name.to_string()))?
            .set_descriptor(descriptor);
        Ok(())
    }

    /// Evaluate a variable and run the check for the branch it took
    ///
    /// Returns whether that check held; a failing check is also recorded.
    pub fn assert_automated_variable(&mut self, name: &str) -> Result<bool, SessionError> {
        let (source, descriptor) = self.variable_parts(name)?;
        let outcome = match source {
            VariableSource::Literal(value) => Ok(value.is_truthy()),
            VariableSource::Prepared(function) => {
                let args = function.resolve_args(&mut self.fixtures, &self.rng)?;
                function
                    .execute_with(&args)
                    .map(|value| value.is_truthy())
                    .map_err(|e| format!("{:#}", e))
            }
        };
        Ok(self.check_branch(name, &descriptor, outcome))
    }

    pub async fn assert_automated_variable_async(&mut self, name: &str) -> Result<bool, SessionError> {
        let (source, descriptor) = self.variable_parts(name)?;
        let outcome = match source {
            VariableSource::Literal(value) => Ok(value.is_truthy()),
            VariableSource::Prepared(function) => {
                let args = function.resolve_args(&mut self.fixtures, &self.rng)?;
                function
                    .execute_with_async(args)
                    .await
                    .map(|value| value.is_truthy())
                    .map_err(|e| format!("{:#}", e))
            }
        };
        Ok(self.check_branch(name, &descriptor, outcome))
    }

    fn variable_parts(&self, name: &str) -> Result<(VariableSource, VariableDescriptor), SessionError> {
        let variable = self
            .variables
            .get(name)
            .ok_or_else(|| SessionError::Key(name.to_string()))?;
        let descriptor = variable
            .descriptor()
            .cloned()
            .ok_or_else(|| SessionError::DescriptorMissing(name.to_string()))?;
        Ok((variable.source().clone(), descriptor))
    }

    fn check_branch(
        &mut self,
        name: &str,
        descriptor: &VariableDescriptor,
        outcome: Result<bool, String>,
    ) -> bool {
        let seed = self.seed();
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(reason) => {
                self.record(FailedAssertion::new(
                    Value::Undefined,
                    Value::Undefined,
                    seed,
                    format!("Assertion variable '{}' could not be evaluated: {}", name, reason),
                ));
                return false;
            }
        };

        let message = match catching(|| Ok(descriptor.check(outcome))) {
            Ok(true) => {
                self.trace(|| format!("Variable '{}' held on its {} branch", name, outcome));
                return true;
            }
            Ok(false) => format!(
                "Assertion variable '{}' took the {} branch and its check did not hold",
                name, outcome
            ),
            Err(e) => format!(
                "Assertion variable '{}' took the {} branch and its check failed: {:#}",
                name, outcome, e
            ),
        };
        self.record(FailedAssertion::new(
            Value::Bool(false),
            Value::Bool(true),
            seed,
            message,
        ));
        false
    }

    // ---- failures and reporting ----------------------------------------

    pub fn failed_assertions(&self) -> &[FailedAssertion] {
        self.failures.as_slice()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Snapshot of the seed and every failure so far
    pub fn report(&self, test_name: &str) -> SessionReport {
        SessionReport::new(test_name, self.seed(), self.failures.as_slice())
    }

    fn record(&mut self, failure: FailedAssertion) {
        self.observer.failure(&failure);
        self.failures.push(failure);
    }

    fn trace(&self, message: impl FnOnce() -> String) {
        if self.config.verbose {
            self.observer.trace(&message());
        }
    }
}

impl std::fmt::Debug for TestSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestSession")
            .field("seed", &format_args!("0x{:016x}", self.seed()))
            .field("fixtures", &self.fixtures.len())
            .field("stages", &self.stages.len())
            .field("failures", &self.failures.len())
            .finish()
    }
}

//! Stage engine
//!
//! Stages are named steps executed sequentially in ascending `order`. Ties
//! are broken by registration order, and a stage replaced with `override`
//! keeps the slot of the stage it replaced. A stage's `depends_on` fixtures
//! are regenerated and passed to its action positionally.
//!
//! A failing stage (error, panic, or unresolvable dependency) is recorded in
//! the session's failure log and the pipeline moves on to the next stage.
//!
//! ## Example
//!
//! ```rust
//! use seeded_testing_framework::prelude::*;
//!
//! let mut session = TestSession::new(SessionConfig::with_seed(42));
//! session.set_property("status", RangeGenerator::integer(500, 600).unwrap());
//!
//! session
//!     .set_staging(Stage::new("log status", |args| {
//!         assert!(matches!(args[0], Value::Int(500..=600)));
//!         Ok(())
//!     }).with_dependencies(["status"]), false)
//!     .unwrap();
//!
//! session.run_staging();
//! assert!(session.failed_assertions().is_empty());
//! ```

mod stage;

pub use stage::{Stage, StageAction, StageKind};

pub(crate) use stage::{catching, panic_message};

use crate::assertions::{FailedAssertion, FailureLog};
use crate::error::StagingError;
use crate::fixtures::FixtureStore;
use crate::observer::SessionObserver;
use crate::orchestrator::SeedProvider;
use crate::value::Value;
use indexmap::IndexMap;

/// Borrowed session state a pipeline run needs
pub struct StageContext<'a> {
    pub fixtures: &'a mut FixtureStore,
    pub rng: &'a dyn SeedProvider,
    pub failures: &'a mut FailureLog,
    pub observer: &'a dyn SessionObserver,
    pub verbose: bool,
}

impl StageContext<'_> {
    pub(crate) fn record(&mut self, failure: FailedAssertion) {
        self.observer.failure(&failure);
        self.failures.push(failure);
    }

    pub(crate) fn trace(&self, message: impl FnOnce() -> String) {
        if self.verbose {
            self.observer.trace(&message());
        }
    }

    /// Resolve fixture names into positional arguments
    ///
    /// Fails on the first name that cannot be resolved.
    fn resolve_args(&mut self, names: &[String], regenerate: bool) -> Result<Vec<Value>, String> {
        names
            .iter()
            .map(|name| {
                self.fixtures
                    .get_inner_actual(name, regenerate, self.rng)
                    .map_err(|e| format!("cannot resolve fixture '{}': {}", name, e))
            })
            .collect()
    }
}

/// Which fixtures a single stage run receives
#[derive(Debug, Clone, Copy)]
enum ArgSource<'a> {
    /// The stage's own `depends_on`, regenerated
    Declared,
    /// An explicit list of fixture names
    Explicit { names: &'a [String], regenerate: bool },
}

/// Ordered registry of stages, unique by name
#[derive(Debug, Default)]
pub struct StageRegistry {
    stages: IndexMap<String, Stage>,
}

impl StageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stage
    ///
    /// Without `override_existing`, fails if a stage with the same name
    /// exists, or a differently named stage has the same order. A same-named
    /// stage is replaced in place.
    pub fn insert(&mut self, stage: Stage, override_existing: bool) -> Result<(), StagingError> {
        if !override_existing {
            let clash = self.stages.contains_key(stage.name())
                || self.stages.values().any(|s| s.order() == stage.order());
            if clash {
                return Err(StagingError::StageExists(stage.name().to_string()));
            }
        }
        self.stages.insert(stage.name().to_string(), stage);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<Stage, StagingError> {
        self.stages
            .shift_remove(name)
            .ok_or_else(|| StagingError::StageNotFound(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&Stage> {
        self.stages.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Stage> {
        self.stages.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.stages.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stage names in execution order
    pub fn execution_order(&self) -> Vec<String> {
        let mut ordered: Vec<&Stage> = self.stages.values().collect();
        // stable: equal orders keep registration order
        ordered.sort_by_key(|stage| stage.order());
        ordered.into_iter().map(|s| s.name().to_string()).collect()
    }

    /// Run every stage once, in order
    pub fn run_all(&mut self, ctx: &mut StageContext<'_>) {
        for name in self.execution_order() {
            self.run_named(&name, ArgSource::Declared, ctx);
        }
    }

    /// Run every stage once, in order, awaiting each before the next
    pub async fn run_all_async(&mut self, ctx: &mut StageContext<'_>) {
        for name in self.execution_order() {
            self.run_named_async(&name, ArgSource::Declared, ctx).await;
        }
    }

    /// Run a single stage with its declared dependencies
    pub fn run_one(&mut self, name: &str, ctx: &mut StageContext<'_>) -> Result<(), StagingError> {
        self.ensure(name)?;
        self.run_named(name, ArgSource::Declared, ctx);
        Ok(())
    }

    /// Run a single stage with an explicit fixture list
    pub fn run_one_with(
        &mut self,
        name: &str,
        regenerate: bool,
        fixtures: &[String],
        ctx: &mut StageContext<'_>,
    ) -> Result<(), StagingError> {
        self.ensure(name)?;
        let source = ArgSource::Explicit {
            names: fixtures,
            regenerate,
        };
        self.run_named(name, source, ctx);
        Ok(())
    }

    pub async fn run_one_async(
        &mut self,
        name: &str,
        ctx: &mut StageContext<'_>,
    ) -> Result<(), StagingError> {
        self.ensure(name)?;
        self.run_named_async(name, ArgSource::Declared, ctx).await;
        Ok(())
    }

    fn ensure(&self, name: &str) -> Result<(), StagingError> {
        if self.stages.contains_key(name) {
            Ok(())
        } else {
            Err(StagingError::StageNotFound(name.to_string()))
        }
    }

    /// Look up a pending stage and its arguments, recording resolution failures
    fn prepare<'s>(
        &'s mut self,
        name: &str,
        source: ArgSource<'_>,
        ctx: &mut StageContext<'_>,
    ) -> Option<(&'s mut Stage, Vec<Value>)> {
        let stage = self.stages.get_mut(name)?;
        if !stage.is_pending() {
            ctx.trace(|| format!("Stage '{}' already ran, skipping", name));
            return None;
        }

        let (names, regenerate) = match source {
            ArgSource::Declared => (stage.depends_on().to_vec(), true),
            ArgSource::Explicit { names, regenerate } => (names.to_vec(), regenerate),
        };

        match ctx.resolve_args(&names, regenerate) {
            Ok(args) => Some((stage, args)),
            Err(reason) => {
                let seed = ctx.rng.seed();
                ctx.record(FailedAssertion::stage(name, seed, reason));
                None
            }
        }
    }

    fn run_named(&mut self, name: &str, source: ArgSource<'_>, ctx: &mut StageContext<'_>) {
        let Some((stage, args)) = self.prepare(name, source, ctx) else {
            return;
        };
        ctx.trace(|| format!("Running stage '{}' (order {})", name, stage.order()));
        if let Err(e) = stage.invoke(&args) {
            let seed = ctx.rng.seed();
            ctx.record(FailedAssertion::stage(name, seed, format!("{:#}", e)));
        }
    }

    async fn run_named_async(
        &mut self,
        name: &str,
        source: ArgSource<'_>,
        ctx: &mut StageContext<'_>,
    ) {
        let Some((stage, args)) = self.prepare(name, source, ctx) else {
            return;
        };
        ctx.trace(|| format!("Running stage '{}' (order {})", name, stage.order()));
        if let Err(e) = stage.invoke_async(args).await {
            let seed = ctx.rng.seed();
            ctx.record(FailedAssertion::stage(name, seed, format!("{:#}", e)));
        }
    }
}

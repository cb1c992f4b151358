//! Prepared functions: deferred callbacks producing expected values.

use crate::error::{PropsError, SessionError};
use crate::fixtures::FixtureStore;
use crate::orchestrator::SeedProvider;
use crate::stages::{catching, panic_message};
use crate::value::Value;
use anyhow::{anyhow, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

type SyncCallback = Arc<dyn Fn(&[Value]) -> Result<Value> + Send + Sync>;
type AsyncCallback = Arc<dyn Fn(Vec<Value>) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

#[derive(Clone)]
enum Callback {
    Sync(SyncCallback),
    Async(AsyncCallback),
}

/// A callback plus either fixed arguments or fixture dependencies
///
/// Fixture dependencies are regenerated on every execution. Fixed arguments
/// and fixture dependencies are mutually exclusive.
///
/// ```rust
/// use seeded_testing_framework::assertions::PreparedFunction;
/// use seeded_testing_framework::Value;
///
/// let double = PreparedFunction::new(|args| {
///     Ok(Value::Int(args[0].as_i64().unwrap_or(0) * 2))
/// })
/// .with_fixed_args([Value::Int(21)])
/// .unwrap();
///
/// assert!(double.clone().with_fixture_deps(["status"]).is_err());
/// ```
#[derive(Clone)]
pub struct PreparedFunction {
    callback: Callback,
    fixture_deps: Option<Vec<String>>,
    fixed_args: Option<Vec<Value>>,
}

impl PreparedFunction {
    /// Synchronous callback with no arguments configured
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            callback: Callback::Sync(Arc::new(callback)),
            fixture_deps: None,
            fixed_args: None,
        }
    }

    /// Asynchronous callback with no arguments configured
    pub fn new_async<F, Fut>(callback: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        Self {
            callback: Callback::Async(Arc::new(move |args| callback(args).boxed())),
            fixture_deps: None,
            fixed_args: None,
        }
    }

    /// Callback with optional fixture dependencies or fixed arguments
    ///
    /// Fails with [`PropsError::BothArgumentKinds`] if both are given.
    pub fn with_parts<F>(
        callback: F,
        fixture_deps: Option<Vec<String>>,
        fixed_args: Option<Vec<Value>>,
    ) -> Result<Self, PropsError>
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        if fixture_deps.is_some() && fixed_args.is_some() {
            return Err(PropsError::BothArgumentKinds);
        }
        Ok(Self {
            fixture_deps,
            fixed_args,
            ..Self::new(callback)
        })
    }

    pub fn with_fixture_deps<S: Into<String>>(
        mut self,
        deps: impl IntoIterator<Item = S>,
    ) -> Result<Self, PropsError> {
        self.set_fixture_deps(deps)?;
        Ok(self)
    }

    pub fn with_fixed_args(
        mut self,
        args: impl IntoIterator<Item = Value>,
    ) -> Result<Self, PropsError> {
        self.set_fixed_args(args)?;
        Ok(self)
    }

    /// Fails if fixed arguments are already set
    pub fn set_fixture_deps<S: Into<String>>(
        &mut self,
        deps: impl IntoIterator<Item = S>,
    ) -> Result<(), PropsError> {
        if self.fixed_args.is_some() {
            return Err(PropsError::FixedArgsSet);
        }
        self.fixture_deps = Some(deps.into_iter().map(Into::into).collect());
        Ok(())
    }

    /// Fails if fixture dependencies are already set
    pub fn set_fixed_args(&mut self, args: impl IntoIterator<Item = Value>) -> Result<(), PropsError> {
        if self.fixture_deps.is_some() {
            return Err(PropsError::FixtureDepsSet);
        }
        self.fixed_args = Some(args.into_iter().collect());
        Ok(())
    }

    /// Drop both fixed arguments and fixture dependencies
    pub fn clear_args(&mut self) {
        self.fixture_deps = None;
        self.fixed_args = None;
    }

    pub fn fixture_deps(&self) -> Option<&[String]> {
        self.fixture_deps.as_deref()
    }

    pub fn fixed_args(&self) -> Option<&[Value]> {
        self.fixed_args.as_deref()
    }

    pub fn is_async(&self) -> bool {
        matches!(self.callback, Callback::Async(_))
    }

    /// Arguments for the next execution: regenerated fixtures, fixed args, or none
    pub fn resolve_args(
        &self,
        fixtures: &mut FixtureStore,
        rng: &dyn SeedProvider,
    ) -> Result<Vec<Value>, SessionError> {
        match (&self.fixture_deps, &self.fixed_args) {
            (Some(deps), _) => deps
                .iter()
                .map(|name| fixtures.get_inner_actual(name, true, rng))
                .collect(),
            (None, Some(args)) => Ok(args.clone()),
            (None, None) => Ok(Vec::new()),
        }
    }

    /// Run a synchronous callback; asynchronous ones are refused
    pub fn execute_with(&self, args: &[Value]) -> Result<Value> {
        match &self.callback {
            Callback::Sync(callback) => catching(|| callback(args)),
            Callback::Async(_) => Err(anyhow!(
                "asynchronous prepared function needs the async assertion path"
            )),
        }
    }

    /// Run either kind of callback to completion
    pub async fn execute_with_async(&self, args: Vec<Value>) -> Result<Value> {
        match &self.callback {
            Callback::Sync(callback) => catching(|| callback(&args)),
            Callback::Async(callback) => {
                let future = catching(|| Ok(callback(args)))?;
                match AssertUnwindSafe(future).catch_unwind().await {
                    Ok(result) => result,
                    Err(panic) => Err(anyhow!("panicked: {}", panic_message(panic.as_ref()))),
                }
            }
        }
    }
}

impl fmt::Debug for PreparedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedFunction")
            .field("async", &self.is_async())
            .field("fixture_deps", &self.fixture_deps)
            .field("fixed_args", &self.fixed_args)
            .finish()
    }
}

// File: testing-framework/src/stages/stage.rs
//
// Stage definitions: a named, ordered action that may consume fixture values.

use crate::value::Value;
use anyhow::{anyhow, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};

type SyncAction = Box<dyn FnMut(&[Value]) -> Result<()> + Send>;
type AsyncAction = Box<dyn FnMut(Vec<Value>) -> BoxFuture<'static, Result<()>> + Send>;

/// Callback executed when a stage runs
///
/// Receives the resolved fixture values positionally, in `depends_on` order.
pub enum StageAction {
    Sync(SyncAction),
    Async(AsyncAction),
}

impl std::fmt::Debug for StageAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageAction::Sync(_) => f.write_str("StageAction::Sync"),
            StageAction::Async(_) => f.write_str("StageAction::Async"),
        }
    }
}

/// Execution state of a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// Runs on every pipeline pass
    Plain,
    /// Runs once per session, then becomes a no-op
    RunOnce { has_run: bool },
}

/// A named, orderable unit of setup or execution logic
///
/// # Examples
///
/// ```rust
/// use seeded_testing_framework::stages::Stage;
///
/// let seed_db = Stage::single("seed database", |_| Ok(()));
/// let call_api = Stage::new("call api", |args| {
///     assert_eq!(args.len(), 2);
///     Ok(())
/// })
/// .with_dependencies(["user.name", "status"])
/// .with_order(1);
///
/// assert!(seed_db.is_run_once());
/// assert_eq!(call_api.order(), 1);
/// ```
#[derive(Debug)]
pub struct Stage {
    name: String,
    order: i64,
    depends_on: Vec<String>,
    action: StageAction,
    kind: StageKind,
}

impl Stage {
    /// Plain stage with a synchronous action
    pub fn new<F>(name: impl Into<String>, action: F) -> Self
    where
        F: FnMut(&[Value]) -> Result<()> + Send + 'static,
    {
        Self::with_action(name, StageAction::Sync(Box::new(action)), StageKind::Plain)
    }

    /// Plain stage with an asynchronous action
    pub fn new_async<F, Fut>(name: impl Into<String>, action: F) -> Self
    where
        F: FnMut(Vec<Value>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Self::with_action(name, Self::boxed_async(action), StageKind::Plain)
    }

    /// Run-once stage with a synchronous action
    pub fn single<F>(name: impl Into<String>, action: F) -> Self
    where
        F: FnMut(&[Value]) -> Result<()> + Send + 'static,
    {
        Self::with_action(
            name,
            StageAction::Sync(Box::new(action)),
            StageKind::RunOnce { has_run: false },
        )
    }

    /// Run-once stage with an asynchronous action
    pub fn single_async<F, Fut>(name: impl Into<String>, action: F) -> Self
    where
        F: FnMut(Vec<Value>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Self::with_action(
            name,
            Self::boxed_async(action),
            StageKind::RunOnce { has_run: false },
        )
    }

    /// Stage from an already-built action
    pub fn with_action(name: impl Into<String>, action: StageAction, kind: StageKind) -> Self {
        Self {
            name: name.into(),
            order: 0,
            depends_on: Vec::new(),
            action,
            kind,
        }
    }

    fn boxed_async<F, Fut>(mut action: F) -> StageAction
    where
        F: FnMut(Vec<Value>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        StageAction::Async(Box::new(move |args| action(args).boxed()))
    }

    /// Fixture names resolved (with regeneration) and passed to the action
    pub fn with_dependencies<S: Into<String>>(mut self, deps: impl IntoIterator<Item = S>) -> Self {
        self.depends_on = deps.into_iter().map(Into::into).collect();
        self
    }

    /// Position in the pipeline; lower runs first
    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn order(&self) -> i64 {
        self.order
    }

    pub fn depends_on(&self) -> &[String] {
        &self.depends_on
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn is_run_once(&self) -> bool {
        matches!(self.kind, StageKind::RunOnce { .. })
    }

    pub fn is_async(&self) -> bool {
        matches!(self.action, StageAction::Async(_))
    }

    /// True once a run-once stage has executed; always false for plain stages
    pub fn has_run(&self) -> bool {
        matches!(self.kind, StageKind::RunOnce { has_run: true })
    }

    /// Arm a run-once stage again
    pub fn reset(&mut self) {
        if let StageKind::RunOnce { has_run } = &mut self.kind {
            *has_run = false;
        }
    }

    /// Whether invoking the stage would execute its action
    pub(crate) fn is_pending(&self) -> bool {
        !self.has_run()
    }

    fn mark_ran(&mut self) {
        if let StageKind::RunOnce { has_run } = &mut self.kind {
            *has_run = true;
        }
    }

    /// Execute a synchronous action, catching errors and panics
    ///
    /// Asynchronous actions are refused without being marked as run.
    pub(crate) fn invoke(&mut self, args: &[Value]) -> Result<()> {
        if !self.is_pending() {
            return Ok(());
        }
        let StageAction::Sync(action) = &mut self.action else {
            return Err(anyhow!(
                "asynchronous stage cannot run in a synchronous pipeline"
            ));
        };
        // Marked before running so a failing run-once stage is not retried
        if let StageKind::RunOnce { has_run } = &mut self.kind {
            *has_run = true;
        }
        catching(|| action(args))
    }

    /// Execute either kind of action, awaiting it to completion
    pub(crate) async fn invoke_async(&mut self, args: Vec<Value>) -> Result<()> {
        if !self.is_pending() {
            return Ok(());
        }
        self.mark_ran();
        match &mut self.action {
            StageAction::Sync(action) => catching(|| action(&args)),
            StageAction::Async(action) => {
                let future = catching(|| Ok(action(args)))?;
                match AssertUnwindSafe(future).catch_unwind().await {
                    Ok(result) => result,
                    Err(panic) => Err(anyhow!("panicked: {}", panic_message(panic.as_ref()))),
                }
            }
        }
    }
}

/// Run `f`, turning a panic into an error
pub(crate) fn catching<R>(f: impl FnOnce() -> Result<R>) -> Result<R> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(panic) => Err(anyhow!("panicked: {}", panic_message(panic.as_ref()))),
    }
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

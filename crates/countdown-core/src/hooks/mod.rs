//! Failure hooks - post-process a failed release run
//!
//! When a release run fails, the engine hands its failure to the registered
//! hooks before deciding the exit status. A hook either returns a (possibly
//! narrowed) failure, or `None` to report the run as successful.
//!
//! Hooks are synchronous and run at most once per release attempt. The
//! built-in [`FailureFilter`] drops errors caused by missing issues and pull
//! requests, which only come from cosmetic integrations.

mod engine;
mod filter;

pub use engine::{EngineError, AGGREGATE_ERROR_NAME};
pub use filter::{
    filter_failure, AggregateFailure, ErrorRecord, FailureFilter, PathSegment, ReleaseFailure,
    SingularError,
};

use std::fmt;

/// What the engine passes alongside the failure
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureContext {
    /// Full ordered list of error records for the run
    pub errors: Vec<ErrorRecord>,
    /// Branch the release ran on
    pub branch: Option<String>,
    /// Whether this was a dry run
    pub dry_run: bool,
}

impl FailureContext {
    /// Create a context from the run's error records
    pub fn new(errors: Vec<ErrorRecord>) -> Self {
        Self {
            errors,
            ..Self::default()
        }
    }

    /// Create a context holding a failure's own records
    pub fn for_failure(failure: &ReleaseFailure) -> Self {
        Self::new(failure.errors().to_vec())
    }

    /// Set the branch
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Set dry run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Extension point invoked by the engine when a release run fails
pub trait FailureHook: Send + Sync {
    /// Hook name for diagnostics
    fn name(&self) -> &str;

    /// Inspect a failure. `None` reports the run as successful.
    fn on_error(&self, error: ReleaseFailure, context: &FailureContext) -> Option<ReleaseFailure>;
}

impl FailureHook for FailureFilter {
    fn name(&self) -> &str {
        "ignore-missing-links"
    }

    fn on_error(&self, error: ReleaseFailure, context: &FailureContext) -> Option<ReleaseFailure> {
        self.apply(error, &context.errors)
    }
}

/// Hooks run in registration order
#[derive(Default)]
pub struct HookChain {
    hooks: Vec<Box<dyn FailureHook>>,
}

impl HookChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook
    pub fn register(&mut self, hook: Box<dyn FailureHook>) {
        self.hooks.push(hook);
    }

    /// Registered hook names
    pub fn names(&self) -> Vec<&str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }

    /// Whether any hooks are registered
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run every hook. Stops as soon as one reports success.
    ///
    /// Each hook after the first sees the records left by its predecessor.
    pub fn run(&self, error: ReleaseFailure, context: &FailureContext) -> Option<ReleaseFailure> {
        let mut context = context.clone();
        let mut current = error;

        for hook in &self.hooks {
            current = hook.on_error(current, &context)?;
            if let ReleaseFailure::Aggregate(ref aggregate) = current {
                context.errors = aggregate.errors.clone();
            }
        }

        Some(current)
    }
}

impl fmt::Debug for HookChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookChain")
            .field("hooks", &self.names())
            .finish()
    }
}

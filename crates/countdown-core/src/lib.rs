//! Countdown Core - Release configuration and failure triage
//!
//! This crate provides the typed release configuration consumed by a release
//! engine (branches, plugin pipeline, commit convention), its loading and
//! validation, and the failure hook that decides whether a failed release run
//! only tripped over benign issue/pull-request lookups.

pub mod branches;
pub mod config;
pub mod error;
pub mod hooks;
pub mod pipeline;
pub mod template;

pub use branches::{resolve_branch, ReleaseChannel, ResolvedBranch};
pub use config::{BranchRule, OnErrorConfig, PluginEntry, Prerelease, ReleaseConfig};
pub use error::{ConfigError, CountdownError, Result, TemplateError};
pub use hooks::{
    filter_failure, AggregateFailure, EngineError, ErrorRecord, FailureContext, FailureFilter,
    FailureHook, HookChain, PathSegment, ReleaseFailure, SingularError,
};
pub use pipeline::{LifecycleStep, PluginPipeline};
pub use template::{NextRelease, TemplateVars};

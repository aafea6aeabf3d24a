//! Plugin pipeline introspection
//!
//! The release engine runs every plugin that implements a lifecycle step, in
//! the order the plugins are declared. This module describes that contract
//! for the well-known plugins; it does not execute anything.

use serde::Serialize;

use crate::config::{PluginEntry, ReleaseConfig};

/// Commit analysis plugin
pub const COMMIT_ANALYZER: &str = "@semantic-release/commit-analyzer";
/// Release notes generator plugin
pub const RELEASE_NOTES_GENERATOR: &str = "@semantic-release/release-notes-generator";
/// Package registry publisher plugin
pub const NPM: &str = "@semantic-release/npm";
/// Code hosting release and comment plugin
pub const GITHUB: &str = "@semantic-release/github";
/// Version control commit plugin
pub const GIT: &str = "@semantic-release/git";
/// Changelog file plugin
pub const CHANGELOG: &str = "@semantic-release/changelog";
/// Shell command plugin
pub const EXEC: &str = "@semantic-release/exec";

/// Lifecycle steps of a release run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LifecycleStep {
    /// Verify credentials and configuration
    VerifyConditions,
    /// Determine the release type from commits
    AnalyzeCommits,
    /// Check the computed release
    VerifyRelease,
    /// Produce release notes
    GenerateNotes,
    /// Update files and commit
    Prepare,
    /// Publish the release
    Publish,
    /// Add a release to a distribution channel
    AddChannel,
    /// Notify of a successful release
    Success,
    /// Notify of a failed release
    Fail,
}

impl LifecycleStep {
    /// Get the step name as used by the engine
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VerifyConditions => "verifyConditions",
            Self::AnalyzeCommits => "analyzeCommits",
            Self::VerifyRelease => "verifyRelease",
            Self::GenerateNotes => "generateNotes",
            Self::Prepare => "prepare",
            Self::Publish => "publish",
            Self::AddChannel => "addChannel",
            Self::Success => "success",
            Self::Fail => "fail",
        }
    }

    /// Get all steps in engine order
    pub fn all() -> &'static [LifecycleStep] {
        &[
            Self::VerifyConditions,
            Self::AnalyzeCommits,
            Self::VerifyRelease,
            Self::GenerateNotes,
            Self::Prepare,
            Self::Publish,
            Self::AddChannel,
            Self::Success,
            Self::Fail,
        ]
    }
}

/// Steps implemented by a well-known plugin, `None` for unknown plugins
pub fn known_steps(id: &str) -> Option<&'static [LifecycleStep]> {
    use LifecycleStep::*;

    let steps: &'static [LifecycleStep] = match id {
        COMMIT_ANALYZER => &[AnalyzeCommits],
        RELEASE_NOTES_GENERATOR => &[GenerateNotes],
        NPM => &[VerifyConditions, Prepare, Publish, AddChannel],
        GITHUB => &[VerifyConditions, Publish, AddChannel, Success, Fail],
        GIT => &[VerifyConditions, Prepare],
        CHANGELOG => &[VerifyConditions, Prepare],
        EXEC => &[
            VerifyConditions,
            AnalyzeCommits,
            VerifyRelease,
            GenerateNotes,
            Prepare,
            Publish,
            AddChannel,
            Success,
            Fail,
        ],
        _ => return None,
    };
    Some(steps)
}

/// Ordered view over the configured plugins
#[derive(Debug, Clone, Copy)]
pub struct PluginPipeline<'a> {
    plugins: &'a [PluginEntry],
}

impl<'a> PluginPipeline<'a> {
    /// Wrap a declared plugin list
    pub fn new(plugins: &'a [PluginEntry]) -> Self {
        Self { plugins }
    }

    /// Declared plugins
    pub fn plugins(&self) -> &'a [PluginEntry] {
        self.plugins
    }

    /// Position of a plugin in the pipeline
    pub fn position(&self, id: &str) -> Option<usize> {
        self.plugins.iter().position(|p| p.id() == id)
    }

    /// Look up a plugin by identifier
    pub fn get(&self, id: &str) -> Option<&'a PluginEntry> {
        self.plugins.iter().find(|p| p.id() == id)
    }

    /// Plugins the engine would run for a step, in declared order
    pub fn plugins_for_step(&self, step: LifecycleStep) -> Vec<&'a PluginEntry> {
        self.plugins
            .iter()
            .filter(|p| known_steps(p.id()).is_some_and(|steps| steps.contains(&step)))
            .collect()
    }

    /// Plugins whose lifecycle steps are not known here
    pub fn unknown_plugins(&self) -> Vec<&'a PluginEntry> {
        self.plugins
            .iter()
            .filter(|p| known_steps(p.id()).is_none())
            .collect()
    }
}

impl ReleaseConfig {
    /// Pipeline view over the configured plugins
    pub fn pipeline(&self) -> PluginPipeline<'_> {
        PluginPipeline::new(&self.plugins)
    }
}

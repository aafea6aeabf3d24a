//! Branch resolution
//!
//! Maps the branch a release runs on to the rule that governs it and the
//! channel its versions are published to.

use std::fmt;

use globset::Glob;
use serde::Serialize;
use tracing::debug;

use crate::config::{BranchRule, ReleaseConfig};

/// Release channel of a branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "label", rename_all = "lowercase")]
pub enum ReleaseChannel {
    /// Regular versions
    Stable,
    /// Pre-release versions carrying a label such as "rc"
    Prerelease(String),
}

impl ReleaseChannel {
    /// Pre-release label, if any
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Stable => None,
            Self::Prerelease(label) => Some(label),
        }
    }
}

impl fmt::Display for ReleaseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stable => write!(f, "stable"),
            Self::Prerelease(label) => write!(f, "prerelease ({})", label),
        }
    }
}

/// A concrete branch matched against the configured rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedBranch {
    /// Concrete branch name
    pub name: String,
    /// Name or pattern of the matching rule
    pub rule: String,
    /// Release channel
    pub channel: ReleaseChannel,
    /// Distribution channel, if configured
    pub distribution: Option<String>,
}

/// Whether a rule covers a concrete branch name
pub fn rule_matches(rule: &BranchRule, branch: &str) -> bool {
    let pattern = rule.name();
    if pattern == branch {
        return true;
    }
    match Glob::new(pattern) {
        Ok(glob) => glob.compile_matcher().is_match(branch),
        Err(_) => false,
    }
}

/// Find the first rule, in declared order, that covers `branch`
pub fn resolve_branch(rules: &[BranchRule], branch: &str) -> Option<ResolvedBranch> {
    let rule = rules.iter().find(|r| rule_matches(r, branch))?;
    let channel = match rule.prerelease_label(branch) {
        Some(label) => ReleaseChannel::Prerelease(label),
        None => ReleaseChannel::Stable,
    };
    debug!(branch, rule = rule.name(), %channel, "resolved release branch");

    Some(ResolvedBranch {
        name: branch.to_string(),
        rule: rule.name().to_string(),
        channel,
        distribution: rule.channel().map(str::to_string),
    })
}

impl ReleaseConfig {
    /// Resolve a branch against this configuration
    pub fn resolve_branch(&self, branch: &str) -> Option<ResolvedBranch> {
        resolve_branch(&self.branches, branch)
    }
}

//! Commit message and tag templating
//!
//! Templates use the release engine's `${path.to.value}` placeholder syntax,
//! e.g. `chore(release): ${nextRelease.version} [skip ci]`.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::ReleaseConfig;
use crate::error::{Result, TemplateError};
use crate::pipeline::GIT;

/// Variables available to the git plugin's commit message
pub const RELEASE_VARIABLES: &[&str] = &[
    "nextRelease.version",
    "nextRelease.gitTag",
    "nextRelease.notes",
    "nextRelease.channel",
    "branch.name",
];

/// Variables available to `tagFormat`
pub const TAG_VARIABLES: &[&str] = &["version"];

/// Commit message the git plugin uses when none is configured
pub const DEFAULT_COMMIT_MESSAGE: &str =
    "chore(release): ${nextRelease.version} [skip ci]\n\n${nextRelease.notes}";

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\$\{\s*([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)\s*\}")
            .expect("placeholder pattern is valid")
    })
}

/// Collect the variable names a template references, in order of appearance
pub fn placeholders(template: &str) -> std::result::Result<Vec<String>, TemplateError> {
    let mut names = Vec::new();
    let mut last = 0;
    for caps in placeholder_regex().captures_iter(template) {
        let whole = caps.get(0).expect("capture 0 always present");
        check_literal(&template[last..whole.start()], template)?;
        names.push(caps[1].to_string());
        last = whole.end();
    }
    check_literal(&template[last..], template)?;
    Ok(names)
}

fn check_literal(chunk: &str, template: &str) -> std::result::Result<(), TemplateError> {
    if chunk.contains("${") {
        return Err(TemplateError::Malformed(template.to_string()));
    }
    Ok(())
}

/// Values substituted into templates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateVars {
    values: HashMap<String, String>,
}

impl TemplateVars {
    /// Create an empty variable set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Get a variable
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|s| s.as_str())
    }

    /// Variables for rendering `tagFormat`
    pub fn for_tag(version: &str) -> Self {
        Self::new().with("version", version)
    }

    /// Variables for rendering a commit message
    pub fn for_release(release: &NextRelease, branch: &str) -> Self {
        Self::new()
            .with("nextRelease.version", release.version.to_string())
            .with("nextRelease.gitTag", release.git_tag.clone())
            .with("nextRelease.notes", release.notes.clone())
            .with("nextRelease.channel", release.channel.clone().unwrap_or_default())
            .with("branch.name", branch)
    }
}

/// Render a template, failing on variables that are not provided
pub fn render(template: &str, vars: &TemplateVars) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in placeholder_regex().captures_iter(template) {
        let whole = caps.get(0).expect("capture 0 always present");
        let literal = &template[last..whole.start()];
        check_literal(literal, template)?;
        out.push_str(literal);

        let name = &caps[1];
        let value = vars.get(name).ok_or_else(|| TemplateError::UnknownVariable {
            name: name.to_string(),
            template: template.to_string(),
        })?;
        out.push_str(value);
        last = whole.end();
    }

    let tail = &template[last..];
    check_literal(tail, template)?;
    out.push_str(tail);
    Ok(out)
}

/// The release about to be cut
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextRelease {
    /// Version being released
    pub version: semver::Version,
    /// Git tag for the version
    pub git_tag: String,
    /// Generated release notes
    pub notes: String,
    /// Distribution channel, if the branch has one
    pub channel: Option<String>,
}

impl NextRelease {
    /// Build the next release from a version string and the tag format
    pub fn new(config: &ReleaseConfig, version: &str) -> Result<Self> {
        let version = semver::Version::parse(version.trim_start_matches('v'))?;
        let git_tag = config.git_tag(&version.to_string())?;
        Ok(Self {
            version,
            git_tag,
            notes: String::new(),
            channel: None,
        })
    }

    /// Set the release notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Set the distribution channel
    pub fn with_channel(mut self, channel: Option<String>) -> Self {
        self.channel = channel;
        self
    }
}

impl ReleaseConfig {
    /// Render the git tag for a version
    pub fn git_tag(&self, version: &str) -> Result<String> {
        render(&self.tag_format, &TemplateVars::for_tag(version))
    }

    /// Render the git plugin's commit message.
    ///
    /// Returns `None` when the pipeline does not commit.
    pub fn commit_message(&self, release: &NextRelease, branch: &str) -> Result<Option<String>> {
        let Some(git) = self.plugins.iter().find(|p| p.id() == GIT) else {
            return Ok(None);
        };
        let template = git.option_str("message").unwrap_or(DEFAULT_COMMIT_MESSAGE);
        render(template, &TemplateVars::for_release(release, branch)).map(Some)
    }
}

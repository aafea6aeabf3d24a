//! Failure classification and filtering

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::{IgnoreRule, OnErrorConfig, PathMatch};

/// One segment of an error path: an object key or a list index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Object key, e.g. "pullRequests"
    Key(String),
    /// List index, kept as the number the engine sent
    Index(serde_json::Number),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<u64> for PathSegment {
    fn from(index: u64) -> Self {
        PathSegment::Index(index.into())
    }
}

impl PartialEq<str> for PathSegment {
    fn eq(&self, other: &str) -> bool {
        matches!(self, PathSegment::Key(key) if key == other)
    }
}

impl PartialEq<&str> for PathSegment {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

/// One failure surfaced by the release engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Classification tag, e.g. "NOT_FOUND"
    #[serde(rename = "type", default)]
    pub error_type: String,

    /// Location of what failed, e.g. `["issue", "update"]`
    #[serde(default)]
    pub path: Vec<PathSegment>,

    /// Human-readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Fields the engine attached that are carried through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ErrorRecord {
    /// Create a record from a type and path segments
    pub fn new<I, S>(error_type: impl Into<String>, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        Self {
            error_type: error_type.into(),
            path: path.into_iter().map(Into::into).collect(),
            message: None,
            extra: Map::new(),
        }
    }

    /// Create a "NOT_FOUND" record
    pub fn not_found<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        Self::new("NOT_FOUND", path)
    }

    /// Set the message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Path segments joined with "."
    pub fn joined_path(&self) -> String {
        self.path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.error_type, self.joined_path())?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

/// A failure that is not a collection of sub-errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingularError {
    /// Error name, e.g. "FetchError"
    pub name: String,
    /// Error message, absent when the engine sent none
    pub message: Option<String>,
    /// Engine error code, e.g. "EGITNOPERMISSION"
    pub code: Option<String>,
    /// Remaining fields, carried through untouched
    pub details: Map<String, Value>,
}

impl SingularError {
    /// Create a singular error
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: Some(message.into()),
            code: None,
            details: Map::new(),
        }
    }

    /// Set the error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl fmt::Display for SingularError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        if let Some(ref code) = self.code {
            write!(f, " ({})", code)?;
        }
        Ok(())
    }
}

/// All problems encountered during one release attempt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateFailure {
    /// Summary message
    pub message: Option<String>,
    /// Constituent errors, in engine order
    pub errors: Vec<ErrorRecord>,
    /// Remaining fields, carried through untouched
    pub details: Map<String, Value>,
}

impl AggregateFailure {
    /// Create an aggregate from its records
    pub fn new(errors: Vec<ErrorRecord>) -> Self {
        Self {
            message: None,
            errors,
            details: Map::new(),
        }
    }

    /// Set the summary message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Display for AggregateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} error(s))",
            self.message.as_deref().unwrap_or("release failed"),
            self.errors.len()
        )
    }
}

/// Failure value handed to the hook
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReleaseFailure {
    /// A single error, never filtered
    #[error("{0}")]
    Singular(SingularError),
    /// A collection of sub-errors, subject to filtering
    #[error("{0}")]
    Aggregate(AggregateFailure),
}

impl ReleaseFailure {
    /// Whether this is an aggregate
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Self::Aggregate(_))
    }

    /// Constituent errors; empty for singular errors
    pub fn errors(&self) -> &[ErrorRecord] {
        match self {
            Self::Singular(_) => &[],
            Self::Aggregate(aggregate) => &aggregate.errors,
        }
    }
}

impl From<SingularError> for ReleaseFailure {
    fn from(error: SingularError) -> Self {
        Self::Singular(error)
    }
}

impl From<AggregateFailure> for ReleaseFailure {
    fn from(aggregate: AggregateFailure) -> Self {
        Self::Aggregate(aggregate)
    }
}

/// Decides which error records are ignorable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureFilter {
    enabled: bool,
    path_match: PathMatch,
    rules: Vec<IgnoreRule>,
}

impl Default for FailureFilter {
    fn default() -> Self {
        Self::from_config(&OnErrorConfig::default())
    }
}

impl FailureFilter {
    /// Build a filter from the `onError` configuration
    pub fn from_config(config: &OnErrorConfig) -> Self {
        Self {
            enabled: config.enabled,
            path_match: config.path_match,
            rules: config.ignore.clone(),
        }
    }

    /// Whether the filter is active
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether a record is noise rather than a genuine problem
    pub fn is_ignorable(&self, record: &ErrorRecord) -> bool {
        let path = record.joined_path();
        self.rules.iter().any(|rule| {
            rule.error_type == record.error_type
                && rule
                    .path_contains
                    .iter()
                    .any(|token| path_matches(self.path_match, &path, token))
        })
    }

    /// Filter a failure against the records the engine reported with it.
    ///
    /// Returns `None` when nothing significant remains and the release
    /// should be treated as successful. Singular errors come back unchanged.
    pub fn apply(&self, error: ReleaseFailure, errors: &[ErrorRecord]) -> Option<ReleaseFailure> {
        match error {
            ReleaseFailure::Aggregate(mut aggregate) if self.enabled => {
                let significant: Vec<ErrorRecord> = errors
                    .iter()
                    .filter(|record| !self.is_ignorable(record))
                    .cloned()
                    .collect();

                if significant.is_empty() {
                    return None;
                }

                aggregate.errors = significant;
                Some(ReleaseFailure::Aggregate(aggregate))
            }
            other => Some(other),
        }
    }
}

/// Apply the default policy: drop "NOT_FOUND" records whose path mentions
/// an issue or pull request.
pub fn filter_failure(error: ReleaseFailure, errors: &[ErrorRecord]) -> Option<ReleaseFailure> {
    FailureFilter::default().apply(error, errors)
}

fn path_matches(mode: PathMatch, path: &str, token: &str) -> bool {
    match mode {
        PathMatch::Substring => path.contains(token),
        PathMatch::Word => {
            let token = token.to_lowercase();
            let plural = format!("{}s", token);
            path_words(path)
                .iter()
                .any(|word| *word == token || *word == plural)
        }
    }
}

/// Split a path into lowercase words at separators and camelCase humps
fn path_words(path: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in path.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_numeric();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

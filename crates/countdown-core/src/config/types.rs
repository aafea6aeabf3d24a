//! Configuration types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::pipeline::{COMMIT_ANALYZER, GIT, GITHUB, NPM, RELEASE_NOTES_GENERATOR};

/// Main configuration consumed by the release engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReleaseConfig {
    /// Version of the config schema
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Branches that produce releases, in priority order
    pub branches: Vec<BranchRule>,

    /// Ordered plugin pipeline
    pub plugins: Vec<PluginEntry>,

    /// Commit-message convention used to classify changes
    pub preset: String,

    /// Git tag format (e.g., "v${version}")
    pub tag_format: String,

    /// Failure post-processing policy
    pub on_error: OnErrorConfig,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            schema: None,
            branches: vec![
                BranchRule::Name("main".to_string()),
                BranchRule::Rule {
                    name: "staging".to_string(),
                    prerelease: Some(Prerelease::Label("rc".to_string())),
                    channel: None,
                },
            ],
            plugins: vec![
                PluginEntry::Name(COMMIT_ANALYZER.to_string()),
                PluginEntry::Name(RELEASE_NOTES_GENERATOR.to_string()),
                PluginEntry::with_options(NPM, [("npmPublish", Value::Bool(false))]),
                PluginEntry::with_options(
                    GITHUB,
                    [
                        ("successComment", Value::Bool(false)),
                        ("failComment", Value::Bool(false)),
                        ("failTitle", Value::Bool(false)),
                        ("labels", Value::Bool(false)),
                        ("releasedLabels", Value::Bool(false)),
                        ("addReleases", Value::String("bottom".to_string())),
                    ],
                ),
                PluginEntry::with_options(
                    GIT,
                    [
                        (
                            "assets",
                            Value::Array(vec![Value::String("package.json".to_string())]),
                        ),
                        (
                            "message",
                            Value::String(
                                "chore(release): ${nextRelease.version} [skip ci]\n\n${nextRelease.notes}"
                                    .to_string(),
                            ),
                        ),
                    ],
                ),
            ],
            preset: "angular".to_string(),
            tag_format: "v${version}".to_string(),
            on_error: OnErrorConfig::default(),
        }
    }
}

/// A branch eligible for release
///
/// A plain name is equivalent to a structured rule without a prerelease label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BranchRule {
    /// Plain branch name or glob pattern
    Name(String),
    /// Branch with prerelease and distribution channel settings
    Rule {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prerelease: Option<Prerelease>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        channel: Option<String>,
    },
}

impl BranchRule {
    /// Branch name or pattern
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Rule { name, .. } => name,
        }
    }

    /// Prerelease setting, if any
    pub fn prerelease(&self) -> Option<&Prerelease> {
        match self {
            Self::Name(_) => None,
            Self::Rule { prerelease, .. } => prerelease.as_ref(),
        }
    }

    /// Distribution channel, if any
    pub fn channel(&self) -> Option<&str> {
        match self {
            Self::Name(_) => None,
            Self::Rule { channel, .. } => channel.as_deref(),
        }
    }

    /// Whether versions cut from this branch are prereleases
    pub fn is_prerelease(&self) -> bool {
        match self.prerelease() {
            Some(Prerelease::Label(_)) => true,
            Some(Prerelease::Enabled(enabled)) => *enabled,
            None => false,
        }
    }

    /// Prerelease label for a concrete branch matched by this rule.
    ///
    /// `prerelease: true` uses the branch name itself as the label.
    pub fn prerelease_label(&self, branch: &str) -> Option<String> {
        match self.prerelease()? {
            Prerelease::Label(label) => Some(label.clone()),
            Prerelease::Enabled(true) => Some(branch.to_string()),
            Prerelease::Enabled(false) => None,
        }
    }
}

/// Prerelease setting of a branch rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Prerelease {
    /// `true` derives the label from the branch name, `false` disables it
    Enabled(bool),
    /// Explicit label such as "rc"
    Label(String),
}

/// One step of the plugin pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PluginEntry {
    /// Plugin identifier with default options
    Name(String),
    /// Plugin identifier with plugin-specific options
    WithOptions(String, Map<String, Value>),
}

impl PluginEntry {
    /// Build an entry with options from key/value pairs
    pub fn with_options<I, K>(id: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self::WithOptions(
            id.into(),
            options.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        )
    }

    /// Plugin identifier
    pub fn id(&self) -> &str {
        match self {
            Self::Name(id) => id,
            Self::WithOptions(id, _) => id,
        }
    }

    /// Plugin options, if any were given
    pub fn options(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Name(_) => None,
            Self::WithOptions(_, options) => Some(options),
        }
    }

    /// Look up a single option
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options()?.get(key)
    }

    /// Look up a boolean option
    pub fn option_bool(&self, key: &str) -> Option<bool> {
        self.option(key)?.as_bool()
    }

    /// Look up a string option
    pub fn option_str(&self, key: &str) -> Option<&str> {
        self.option(key)?.as_str()
    }
}

/// Failure post-processing policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OnErrorConfig {
    /// Whether the filter runs at all
    pub enabled: bool,

    /// How ignore tokens are matched against error paths
    pub path_match: PathMatch,

    /// Rules describing ignorable error records
    pub ignore: Vec<IgnoreRule>,
}

impl Default for OnErrorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path_match: PathMatch::Substring,
            ignore: vec![IgnoreRule::default()],
        }
    }
}

/// Path matching mode for ignore rules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathMatch {
    /// Token appears anywhere in the dot-joined path
    #[default]
    Substring,
    /// Token equals a path word or its plural
    Word,
}

impl PathMatch {
    /// Get mode as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Substring => "substring",
            Self::Word => "word",
        }
    }
}

/// An error classification plus the path tokens that make it ignorable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IgnoreRule {
    /// Error classification tag, e.g. "NOT_FOUND"
    #[serde(rename = "type")]
    pub error_type: String,

    /// Tokens of which at least one must occur in the error path
    pub path_contains: Vec<String>,
}

impl Default for IgnoreRule {
    fn default() -> Self {
        Self {
            error_type: "NOT_FOUND".to_string(),
            path_contains: vec!["issue".to_string(), "pull".to_string(), "pr".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_reference_setup() {
        let config = ReleaseConfig::default();
        assert_eq!(config.branches.len(), 2);
        assert_eq!(config.branches[0].name(), "main");
        assert!(!config.branches[0].is_prerelease());
        assert_eq!(config.branches[1].prerelease_label("staging"), Some("rc".to_string()));

        let ids: Vec<&str> = config.plugins.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![COMMIT_ANALYZER, RELEASE_NOTES_GENERATOR, NPM, GITHUB, GIT]);
        assert_eq!(config.plugins[2].option_bool("npmPublish"), Some(false));
        assert_eq!(config.plugins[3].option_str("addReleases"), Some("bottom"));
        assert_eq!(config.preset, "angular");
    }

    #[test]
    fn test_plain_branch_equals_rule_without_prerelease() {
        let plain = BranchRule::Name("main".to_string());
        let rule = BranchRule::Rule {
            name: "main".to_string(),
            prerelease: None,
            channel: None,
        };
        assert_eq!(plain.name(), rule.name());
        assert_eq!(plain.is_prerelease(), rule.is_prerelease());
        assert_eq!(plain.prerelease_label("main"), rule.prerelease_label("main"));
    }

    #[test]
    fn test_prerelease_true_uses_branch_name() {
        let rule = BranchRule::Rule {
            name: "beta".to_string(),
            prerelease: Some(Prerelease::Enabled(true)),
            channel: None,
        };
        assert!(rule.is_prerelease());
        assert_eq!(rule.prerelease_label("beta"), Some("beta".to_string()));
    }

    #[test]
    fn test_deserialize_mixed_branches_and_plugins() {
        let json = r#"{
            "branches": ["main", {"name": "next", "prerelease": true, "channel": "next"}],
            "plugins": [
                "@semantic-release/commit-analyzer",
                ["@semantic-release/npm", {"npmPublish": false}]
            ],
            "preset": "conventionalcommits"
        }"#;

        let config: ReleaseConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.branches[0], BranchRule::Name("main".to_string()));
        assert_eq!(config.branches[1].channel(), Some("next"));
        assert!(config.branches[1].is_prerelease());
        assert!(config.plugins[0].options().is_none());
        assert_eq!(config.plugins[1].option_bool("npmPublish"), Some(false));
        assert_eq!(config.preset, "conventionalcommits");
        // Unspecified keys fall back to defaults
        assert_eq!(config.tag_format, "v${version}");
        assert_eq!(config.on_error, OnErrorConfig::default());
    }

    #[test]
    fn test_on_error_keys_are_camel_case() {
        let yaml = "onError:\n  pathMatch: word\n  ignore:\n    - type: NOT_FOUND\n      pathContains: [issue]\n";
        let config: ReleaseConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.on_error.enabled);
        assert_eq!(config.on_error.path_match, PathMatch::Word);
        assert_eq!(config.on_error.ignore[0].error_type, "NOT_FOUND");
        assert_eq!(config.on_error.ignore[0].path_contains, vec!["issue"]);
    }

    #[test]
    fn test_default_config_survives_json() {
        let config = ReleaseConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"onError\""));
        assert!(json.contains("\"tagFormat\""));
        let parsed: ReleaseConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}

//! Default configuration values

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "countdown.yaml";

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "countdown.toml";

/// Alternative configuration file name
pub const ALT_CONFIG_FILE: &str = ".countdown.yaml";

/// Get list of config file names to search for
///
/// The `.releaserc` names let an existing release-engine config be read
/// in place.
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_YAML,
        DEFAULT_CONFIG_TOML,
        ALT_CONFIG_FILE,
        ".countdown.toml",
        ".releaserc.json",
        ".releaserc.yaml",
        ".releaserc",
    ]
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Countdown Configuration
# See https://github.com/example/countdown for documentation

branches:
  - main
  - name: staging
    prerelease: rc

plugins:
  - "@semantic-release/commit-analyzer"
  - "@semantic-release/release-notes-generator"
  - - "@semantic-release/npm"
    - npmPublish: false
  - - "@semantic-release/github"
    - successComment: false
      failComment: false
      failTitle: false
      labels: false
      releasedLabels: false
      addReleases: bottom
  - - "@semantic-release/git"
    - assets:
        - package.json
      message: "chore(release): ${nextRelease.version} [skip ci]\n\n${nextRelease.notes}"

preset: angular
tagFormat: "v${version}"

# Failures whose every error is a missing issue or pull request are
# reported as a successful release.
onError:
  enabled: true
  pathMatch: substring
  ignore:
    - type: NOT_FOUND
      pathContains: [issue, pull, pr]
"#;

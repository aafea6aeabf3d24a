//! Configuration loading

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result};

use super::defaults::config_file_names;
use super::types::ReleaseConfig;
use super::validation::validate_config;

/// On-disk configuration formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
    Yaml,
}

impl Format {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::Toml,
            Some("json") => Self::Json,
            // YAML also covers extensionless `.releaserc` files holding JSON
            _ => Self::Yaml,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }
}

/// Parse configuration text without validating it
pub fn parse_config(content: &str, path: &Path) -> Result<ReleaseConfig> {
    let config = match Format::for_path(path) {
        Format::Toml => toml::from_str(content).map_err(ConfigError::TomlError)?,
        Format::Json => serde_json::from_str(content).map_err(ConfigError::JsonError)?,
        Format::Yaml => serde_yaml::from_str(content).map_err(ConfigError::YamlError)?,
    };
    Ok(config)
}

/// Load configuration from a file
pub fn load_config(path: &Path) -> Result<ReleaseConfig> {
    let format = Format::for_path(path);
    info!(path = %path.display(), format = format.as_str(), "loading config");

    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config = parse_config(&content, path)?;

    validate_config(&config)?;
    debug!(path = %path.display(), "config loaded and validated");
    Ok(config)
}

/// Find configuration file in directory or parent directories.
///
/// At each directory level the search checks:
///   1. `<dir>/<name>`          (e.g. `countdown.yaml`)
///   2. `<dir>/.github/<name>`  (e.g. `.github/countdown.yaml`)
///
/// The first match wins. Parents are walked until the filesystem root.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for config file");
    let mut current = start_dir.to_path_buf();

    loop {
        for name in config_file_names() {
            let config_path = current.join(name);
            if config_path.is_file() {
                info!(path = %config_path.display(), "found config file");
                return Some(config_path);
            }

            let github_path = current.join(".github").join(name);
            if github_path.is_file() {
                info!(path = %github_path.display(), "found config file in .github/");
                return Some(github_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    debug!("no config file found");
    None
}

/// Load configuration from directory (searching parent directories)
pub fn load_config_from_dir(dir: &Path) -> Result<(ReleaseConfig, PathBuf)> {
    let config_path = find_config(dir).ok_or_else(|| ConfigError::NotFound(dir.to_path_buf()))?;

    let config = load_config(&config_path)?;
    Ok((config, config_path))
}

/// Load configuration or use defaults
pub fn load_config_or_default(dir: &Path) -> (ReleaseConfig, Option<PathBuf>) {
    match load_config_from_dir(dir) {
        Ok((config, path)) => (config, Some(path)),
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "no usable config found, using defaults");
            (ReleaseConfig::default(), None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BranchRule, PathMatch};
    use crate::error::CountdownError;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_yaml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("countdown.yaml");
        std::fs::write(&config_path, "preset: angular\n").unwrap();

        let found = find_config(temp.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_prefers_yaml_over_releaserc() {
        let temp = TempDir::new().unwrap();
        let yaml_path = temp.path().join("countdown.yaml");
        std::fs::write(&yaml_path, "preset: angular\n").unwrap();
        std::fs::write(temp.path().join(".releaserc.json"), "{}").unwrap();

        let found = find_config(temp.path()).unwrap();
        assert_eq!(found, yaml_path);
    }

    #[test]
    fn test_find_config_in_github_dir() {
        let temp = TempDir::new().unwrap();
        let github_dir = temp.path().join(".github");
        std::fs::create_dir_all(&github_dir).unwrap();
        let config_path = github_dir.join("countdown.toml");
        std::fs::write(&config_path, "preset = \"angular\"\n").unwrap();

        assert_eq!(find_config(temp.path()), Some(config_path));
    }

    #[test]
    fn test_find_config_walks_parents() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join(".releaserc");
        std::fs::write(&config_path, "{}").unwrap();
        let nested = temp.path().join("packages").join("web");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_config(&nested), Some(config_path));
    }

    #[test]
    fn test_load_config_yaml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("countdown.yaml");
        std::fs::write(
            &config_path,
            "branches:\n  - main\n  - name: beta\n    prerelease: true\npreset: conventionalcommits\n",
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.preset, "conventionalcommits");
        assert_eq!(config.branches[0], BranchRule::Name("main".to_string()));
        assert!(config.branches[1].is_prerelease());
    }

    #[test]
    fn test_load_config_toml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("countdown.toml");
        std::fs::write(
            &config_path,
            "branches = [\"main\", { name = \"staging\", prerelease = \"rc\" }]\npreset = \"angular\"\n\n[onError]\npathMatch = \"word\"\n",
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.branches[1].prerelease_label("staging"), Some("rc".to_string()));
        assert_eq!(config.on_error.path_match, PathMatch::Word);
    }

    #[test]
    fn test_load_releaserc_json() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join(".releaserc.json");
        std::fs::write(
            &config_path,
            r#"{"branches": ["main"], "plugins": ["@semantic-release/commit-analyzer"]}"#,
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.plugins.len(), 1);
    }

    #[test]
    fn test_load_config_rejects_invalid() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("countdown.yaml");
        std::fs::write(&config_path, "branches:\n  - main\n  - main\n").unwrap();

        let err = load_config(&config_path).unwrap_err();
        assert!(matches!(
            err,
            CountdownError::Config(ConfigError::DuplicateBranch(ref name)) if name == "main"
        ));
    }

    #[test]
    fn test_load_config_or_default_without_file() {
        let temp = TempDir::new().unwrap();
        let (config, path) = load_config_or_default(temp.path());
        assert!(path.is_none());
        assert_eq!(config, ReleaseConfig::default());
    }
}

//! Configuration validation

use std::collections::HashSet;

use globset::Glob;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::pipeline::{PluginPipeline, GIT, RELEASE_NOTES_GENERATOR};
use crate::template::{placeholders, RELEASE_VARIABLES, TAG_VARIABLES};

use super::types::{BranchRule, Prerelease, ReleaseConfig};

/// Validate configuration
pub fn validate_config(config: &ReleaseConfig) -> Result<()> {
    debug!("validating configuration");
    validate_branches(&config.branches)?;
    validate_preset(config)?;
    validate_tag_format(config)?;
    validate_plugins(config)?;
    validate_on_error(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_branches(branches: &[BranchRule]) -> Result<()> {
    if branches.is_empty() {
        return Err(ConfigError::MissingField("branches".to_string()).into());
    }

    let mut seen = HashSet::new();
    for (i, branch) in branches.iter().enumerate() {
        let name = branch.name();
        if name.trim().is_empty() {
            return Err(
                ConfigError::invalid(format!("branches[{}].name", i), "branch name cannot be empty")
                    .into(),
            );
        }

        if !seen.insert(name) {
            return Err(ConfigError::DuplicateBranch(name.to_string()).into());
        }

        if let Err(e) = Glob::new(name) {
            return Err(ConfigError::invalid(
                format!("branches[{}].name", i),
                format!("invalid branch pattern: {}", e),
            )
            .into());
        }

        match branch.prerelease() {
            Some(Prerelease::Label(label)) => {
                validate_prerelease_label(label, &format!("branches[{}].prerelease", i))?;
            }
            Some(Prerelease::Enabled(true)) if !is_pattern(name) => {
                validate_prerelease_label(name, &format!("branches[{}].name", i))?;
            }
            _ => {}
        }
    }

    if branches.iter().all(BranchRule::is_prerelease) {
        return Err(ConfigError::invalid(
            "branches",
            "at least one branch must publish regular (non-prerelease) versions",
        )
        .into());
    }

    Ok(())
}

fn validate_prerelease_label(label: &str, field: &str) -> Result<()> {
    if label.is_empty() || semver::Prerelease::new(label).is_err() {
        return Err(ConfigError::invalid(
            field,
            format!("'{}' is not a valid semver pre-release identifier", label),
        )
        .into());
    }
    Ok(())
}

fn is_pattern(name: &str) -> bool {
    name.contains(['*', '?', '[', '{'])
}

fn validate_preset(config: &ReleaseConfig) -> Result<()> {
    if config.preset.trim().is_empty() {
        return Err(ConfigError::invalid("preset", "preset cannot be empty").into());
    }
    Ok(())
}

fn validate_tag_format(config: &ReleaseConfig) -> Result<()> {
    let names = placeholders(&config.tag_format)?;
    if !names.iter().any(|n| n == "version") {
        return Err(
            ConfigError::invalid("tagFormat", "must contain ${version} placeholder").into(),
        );
    }
    check_known_placeholders("tagFormat", &names, TAG_VARIABLES)
}

fn validate_plugins(config: &ReleaseConfig) -> Result<()> {
    let mut seen = HashSet::new();
    for (i, plugin) in config.plugins.iter().enumerate() {
        if plugin.id().trim().is_empty() {
            return Err(ConfigError::invalid(
                format!("plugins[{}]", i),
                "plugin identifier cannot be empty",
            )
            .into());
        }
        if !seen.insert(plugin.id()) {
            return Err(ConfigError::DuplicatePlugin(plugin.id().to_string()).into());
        }
    }

    let pipeline = PluginPipeline::new(&config.plugins);
    if let Some(git_pos) = pipeline.position(GIT) {
        let Some(message) = pipeline.get(GIT).and_then(|p| p.option_str("message")) else {
            return Ok(());
        };

        let field = format!("plugins[{}].message", git_pos);
        let names = placeholders(message)?;
        check_known_placeholders(&field, &names, RELEASE_VARIABLES)?;

        let wants_notes = names.iter().any(|n| n == "nextRelease.notes");
        let notes_before_commit = pipeline
            .position(RELEASE_NOTES_GENERATOR)
            .is_some_and(|notes_pos| notes_pos < git_pos);
        if wants_notes && !notes_before_commit {
            return Err(ConfigError::invalid(
                field,
                format!(
                    "commit message uses release notes, so {} must run before {}",
                    RELEASE_NOTES_GENERATOR, GIT
                ),
            )
            .into());
        }
    }

    Ok(())
}

fn check_known_placeholders(field: &str, names: &[String], known: &[&str]) -> Result<()> {
    match names.iter().find(|n| !known.contains(&n.as_str())) {
        Some(unknown) => Err(ConfigError::invalid(
            field,
            format!(
                "unknown placeholder ${{{}}}, expected one of: {}",
                unknown,
                known.join(", ")
            ),
        )
        .into()),
        None => Ok(()),
    }
}

fn validate_on_error(config: &ReleaseConfig) -> Result<()> {
    if !config.on_error.ignore.is_empty() {
        debug!(count = config.on_error.ignore.len(), "validating ignore rules");
    }
    for (i, rule) in config.on_error.ignore.iter().enumerate() {
        if rule.error_type.trim().is_empty() {
            return Err(ConfigError::invalid(
                format!("onError.ignore[{}].type", i),
                "error type cannot be empty",
            )
            .into());
        }

        if rule.path_contains.is_empty() || rule.path_contains.iter().any(|t| t.is_empty()) {
            return Err(ConfigError::invalid(
                format!("onError.ignore[{}].pathContains", i),
                "needs at least one non-empty token",
            )
            .into());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PluginEntry;
    use crate::error::CountdownError;
    use serde_json::Value;

    fn field_of(err: CountdownError) -> String {
        match err {
            CountdownError::Config(ConfigError::InvalidValue { field, .. }) => field,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_default_config() {
        let config = ReleaseConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_requires_branches() {
        let mut config = ReleaseConfig::default();
        config.branches.clear();
        assert!(matches!(
            validate_config(&config),
            Err(CountdownError::Config(ConfigError::MissingField(_)))
        ));
    }

    #[test]
    fn test_validate_duplicate_branch() {
        let mut config = ReleaseConfig::default();
        config.branches.push(BranchRule::Rule {
            name: "main".to_string(),
            prerelease: Some(Prerelease::Label("beta".to_string())),
            channel: None,
        });
        assert!(matches!(
            validate_config(&config),
            Err(CountdownError::Config(ConfigError::DuplicateBranch(ref n))) if n == "main"
        ));
    }

    #[test]
    fn test_validate_invalid_prerelease_label() {
        let mut config = ReleaseConfig::default();
        config.branches[1] = BranchRule::Rule {
            name: "staging".to_string(),
            prerelease: Some(Prerelease::Label("r c".to_string())),
            channel: None,
        };
        let err = validate_config(&config).unwrap_err();
        assert_eq!(field_of(err), "branches[1].prerelease");
    }

    #[test]
    fn test_validate_prerelease_true_on_pattern_is_allowed() {
        let mut config = ReleaseConfig::default();
        config.branches.push(BranchRule::Rule {
            name: "feature/*".to_string(),
            prerelease: Some(Prerelease::Enabled(true)),
            channel: None,
        });
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_needs_release_branch() {
        let mut config = ReleaseConfig::default();
        config.branches.remove(0);
        let err = validate_config(&config).unwrap_err();
        assert_eq!(field_of(err), "branches");
    }

    #[test]
    fn test_validate_tag_format() {
        let mut config = ReleaseConfig::default();
        config.tag_format = "release".to_string();
        assert_eq!(field_of(validate_config(&config).unwrap_err()), "tagFormat");

        config.tag_format = "${name}@${version}".to_string();
        assert_eq!(field_of(validate_config(&config).unwrap_err()), "tagFormat");
    }

    #[test]
    fn test_validate_empty_preset() {
        let mut config = ReleaseConfig::default();
        config.preset = " ".to_string();
        assert_eq!(field_of(validate_config(&config).unwrap_err()), "preset");
    }

    #[test]
    fn test_validate_duplicate_plugin() {
        let mut config = ReleaseConfig::default();
        let first = config.plugins[0].clone();
        config.plugins.push(first);
        assert!(matches!(
            validate_config(&config),
            Err(CountdownError::Config(ConfigError::DuplicatePlugin(_)))
        ));
    }

    #[test]
    fn test_validate_notes_must_precede_commit() {
        let mut config = ReleaseConfig::default();
        // Move the notes generator to the end of the pipeline
        let notes = config.plugins.remove(1);
        config.plugins.push(notes);
        let err = validate_config(&config).unwrap_err();
        assert_eq!(field_of(err), "plugins[3].message");
    }

    #[test]
    fn test_validate_commit_message_without_notes_needs_no_generator() {
        let mut config = ReleaseConfig::default();
        config.plugins.retain(|p| p.id() != RELEASE_NOTES_GENERATOR);
        let git = config.plugins.iter_mut().find(|p| p.id() == GIT).unwrap();
        *git = PluginEntry::with_options(
            GIT,
            [(
                "message",
                Value::String("chore(release): ${nextRelease.version}".to_string()),
            )],
        );
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_unknown_message_placeholder() {
        let mut config = ReleaseConfig::default();
        let git = config.plugins.iter_mut().find(|p| p.id() == GIT).unwrap();
        *git = PluginEntry::with_options(
            GIT,
            [("message", Value::String("release ${nextRelease.bogus}".to_string()))],
        );
        assert_eq!(field_of(validate_config(&config).unwrap_err()), "plugins[4].message");
    }

    #[test]
    fn test_validate_ignore_rule_tokens() {
        let mut config = ReleaseConfig::default();
        config.on_error.ignore[0].path_contains.clear();
        assert_eq!(
            field_of(validate_config(&config).unwrap_err()),
            "onError.ignore[0].pathContains"
        );
    }
}

//! Error types for Countdown

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using CountdownError
pub type Result<T> = std::result::Result<T, CountdownError>;

/// Main error type for Countdown operations
#[derive(Debug, Error)]
pub enum CountdownError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Template rendering errors
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Version parsing errors
    #[error("Invalid version: {0}")]
    Version(#[from] semver::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// Two branch rules share a name
    #[error("Duplicate branch name: {0}")]
    DuplicateBranch(String),

    /// Two pipeline entries share a plugin identifier
    #[error("Duplicate plugin: {0}")]
    DuplicatePlugin(String),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Template-related errors
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Placeholder names a variable that is not provided
    #[error("Unknown template variable '{name}' in \"{template}\"")]
    UnknownVariable { name: String, template: String },

    /// `${` that does not form a valid placeholder
    #[error("Malformed placeholder in \"{0}\"")]
    Malformed(String),
}

impl ConfigError {
    /// Shorthand for an invalid value at a field path
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

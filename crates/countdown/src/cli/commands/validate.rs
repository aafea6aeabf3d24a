//! Validate command

use clap::Args;
use console::style;
use tracing::info;

use countdown_core::config::{
    find_config, parse_config, validation::validate_config, PathMatch, ReleaseConfig,
};

use crate::cli::{Cli, OutputFormat};
use crate::exit_codes;

/// Validate the release configuration
#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Strict mode - treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

impl ValidateCommand {
    /// Execute the validate command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(strict = self.strict, "executing validate command");
        let cwd = std::env::current_dir()?;

        let mut errors: Vec<String> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();

        let config_path = cli.config.clone().or_else(|| find_config(&cwd));
        let config = match config_path {
            Some(ref path) => match std::fs::read_to_string(path) {
                Ok(content) => match parse_config(&content, path) {
                    Ok(config) => Some(config),
                    Err(e) => {
                        errors.push(format!("Configuration: {}", e));
                        None
                    }
                },
                Err(e) => {
                    errors.push(format!("Configuration: {}", e));
                    None
                }
            },
            None => {
                errors.push(format!("Configuration: no config file found from {}", cwd.display()));
                None
            }
        };

        if let Some(ref cfg) = config {
            if let Err(e) = validate_config(cfg) {
                errors.push(format!("Configuration validation: {}", e));
            }
            warnings.extend(lint_config(cfg));
        }

        // If strict, promote warnings to errors
        if self.strict {
            errors.append(&mut warnings);
        }

        let passed = errors.is_empty();

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "valid": passed,
                    "config_path": config_path.map(|p| p.to_string_lossy().to_string()),
                    "errors": errors,
                    "warnings": warnings
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    println!("{}", style("Validation Results").bold());
                    println!();

                    if let Some(path) = config_path {
                        println!("Config: {}", style(path.display()).cyan());
                        println!();
                    }

                    if !errors.is_empty() {
                        println!("{}", style("Errors:").red().bold());
                        for error in &errors {
                            println!("  {} {}", style("✗").red(), error);
                        }
                        println!();
                    }

                    if !warnings.is_empty() {
                        println!("{}", style("Warnings:").yellow().bold());
                        for warning in &warnings {
                            println!("  {} {}", style("!").yellow(), warning);
                        }
                        println!();
                    }

                    if passed {
                        if warnings.is_empty() {
                            println!("{}", style("✓ All checks passed").green().bold());
                        } else {
                            println!(
                                "{} with {} warning(s)",
                                style("✓ Validation passed").green().bold(),
                                warnings.len()
                            );
                        }
                    } else {
                        println!(
                            "{} with {} error(s)",
                            style("✗ Validation failed").red().bold(),
                            errors.len()
                        );
                    }
                }
            }
        }

        if !passed {
            std::process::exit(exit_codes::VALIDATION_ERROR);
        }

        Ok(())
    }
}

/// Findings that do not make a configuration invalid
fn lint_config(config: &ReleaseConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    for plugin in config.pipeline().unknown_plugins() {
        warnings.push(format!(
            "Plugin '{}' is not a known plugin; its lifecycle steps are not checked",
            plugin.id()
        ));
    }

    if !config.on_error.enabled {
        warnings.push("onError filtering is disabled; every failure aborts the release".to_string());
    } else if config.on_error.path_match == PathMatch::Substring {
        for rule in &config.on_error.ignore {
            for token in rule.path_contains.iter().filter(|t| t.len() <= 2) {
                warnings.push(format!(
                    "Ignore token '{}' for {} matches inside longer words (e.g. 'protection'); consider pathMatch: word",
                    token, rule.error_type
                ));
            }
        }
    }

    warnings
}

//! Show command

use clap::Args;
use console::style;
use tracing::info;

use countdown_core::config::{BranchRule, Prerelease, ReleaseConfig};
use countdown_core::pipeline::LifecycleStep;

use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

use super::require_config;

/// Show branches, plugin pipeline and failure policy
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Resolve the release channel for this branch
    #[arg(short, long)]
    pub branch: Option<String>,
}

impl ShowCommand {
    /// Execute the show command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(branch = ?self.branch, "executing show command");
        let (config, config_path) = require_config(cli)?;
        let resolved = self.branch.as_deref().map(|b| (b, config.resolve_branch(b)));

        match cli.format {
            OutputFormat::Json => {
                let pipeline = config.pipeline();
                let steps: serde_json::Map<String, serde_json::Value> = LifecycleStep::all()
                    .iter()
                    .map(|step| {
                        let ids: Vec<&str> = pipeline
                            .plugins_for_step(*step)
                            .iter()
                            .map(|p| p.id())
                            .collect();
                        (step.as_str().to_string(), serde_json::json!(ids))
                    })
                    .collect();

                let output = serde_json::json!({
                    "config_path": config_path.to_string_lossy(),
                    "config": config,
                    "steps": steps,
                    "branch": resolved.as_ref().map(|(_, r)| r),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                if cli.quiet {
                    return Ok(());
                }
                println!("{}", output::header("Release Configuration"));
                println!("{}", output::key_value("Config", &config_path.display().to_string()));
                println!("{}", output::key_value("Preset", &config.preset));
                println!("{}", output::key_value("Tag format", &config.tag_format));
                println!();

                print_branches(&config);
                print_pipeline(&config);
                print_on_error(&config);

                if let Some((branch, resolved)) = resolved {
                    match resolved {
                        Some(r) => output::info(&format!(
                            "Branch '{}' releases on the {} channel (rule '{}')",
                            branch, r.channel, r.rule
                        )),
                        None => output::warning(&format!(
                            "Branch '{}' is not configured for releases",
                            branch
                        )),
                    }
                }
            }
        }

        Ok(())
    }
}

fn describe_branch(rule: &BranchRule) -> String {
    let mut text = match rule.prerelease() {
        Some(Prerelease::Label(label)) => format!("prerelease ({})", label),
        Some(Prerelease::Enabled(true)) => "prerelease (branch name)".to_string(),
        _ => "stable".to_string(),
    };
    if let Some(channel) = rule.channel() {
        text.push_str(&format!(", channel {}", channel));
    }
    text
}

fn print_branches(config: &ReleaseConfig) {
    println!("{}", output::header("Branches"));
    for rule in &config.branches {
        println!("{}", output::key_value(rule.name(), &describe_branch(rule)));
    }
    println!();
}

fn print_pipeline(config: &ReleaseConfig) {
    let pipeline = config.pipeline();

    println!("{}", output::header("Plugins"));
    for (i, plugin) in pipeline.plugins().iter().enumerate() {
        let options = plugin
            .options()
            .map(|o| serde_json::Value::Object(o.clone()).to_string())
            .unwrap_or_default();
        println!("  {}. {} {}", i + 1, style(plugin.id()).cyan(), style(options).dim());
    }
    println!();

    println!("{}", output::header("Lifecycle"));
    for step in LifecycleStep::all() {
        let ids: Vec<&str> = pipeline
            .plugins_for_step(*step)
            .iter()
            .map(|p| p.id())
            .collect();
        if !ids.is_empty() {
            println!("{}", output::key_value(step.as_str(), &ids.join(" → ")));
        }
    }
    for plugin in pipeline.unknown_plugins() {
        output::warning(&format!("{}: lifecycle steps unknown", plugin.id()));
    }
    println!();
}

fn print_on_error(config: &ReleaseConfig) {
    let policy = &config.on_error;
    println!("{}", output::header("On error"));
    if !policy.enabled {
        println!("  filtering disabled");
        println!();
        return;
    }
    println!("{}", output::key_value("Path match", policy.path_match.as_str()));
    for rule in &policy.ignore {
        println!(
            "{}",
            output::key_value(
                &format!("Ignore {}", rule.error_type),
                &rule.path_contains.join(", ")
            )
        );
    }
    println!();
}

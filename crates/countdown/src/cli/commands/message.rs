//! Message command

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::{info, warn};

use countdown_core::template::NextRelease;

use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

use super::require_config;

/// Render the git tag and release commit message
#[derive(Debug, Args)]
pub struct MessageCommand {
    /// Version being released (e.g. 1.4.0 or 1.4.0-rc.1)
    pub release_version: String,

    /// Branch the release runs on
    #[arg(short, long, default_value = "main")]
    pub branch: String,

    /// File containing the generated release notes
    #[arg(short, long)]
    pub notes_file: Option<PathBuf>,
}

impl MessageCommand {
    /// Execute the message command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            version = %self.release_version,
            branch = %self.branch,
            "executing message command"
        );
        let (config, _) = require_config(cli)?;

        let resolved = config.resolve_branch(&self.branch).ok_or_else(|| {
            anyhow::anyhow!("Branch '{}' is not configured for releases", self.branch)
        })?;

        let notes = match self.notes_file {
            Some(ref path) => std::fs::read_to_string(path)?,
            None => String::new(),
        };

        let release = NextRelease::new(&config, &self.release_version)?
            .with_notes(notes.trim_end())
            .with_channel(resolved.distribution.clone());

        let expects_pre = resolved.channel.label().is_some();
        if expects_pre != !release.version.pre.is_empty() {
            warn!(
                version = %release.version,
                channel = %resolved.channel,
                "version does not match branch channel"
            );
            if !cli.quiet && cli.format == OutputFormat::Text {
                output::warning(&format!(
                    "Version {} does not look like a {} release",
                    release.version, resolved.channel
                ));
            }
        }

        let message = config.commit_message(&release, &self.branch)?;

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "version": release.version.to_string(),
                    "gitTag": release.git_tag,
                    "channel": resolved.channel,
                    "message": message,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    println!("{}", output::key_value("Tag", &style(&release.git_tag).yellow().to_string()));
                    println!("{}", output::key_value("Channel", &resolved.channel.to_string()));
                    println!();
                }
                match message {
                    Some(message) => println!("{}", message),
                    None => {
                        if !cli.quiet {
                            output::info("Pipeline does not commit release files");
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

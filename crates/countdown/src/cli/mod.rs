//! CLI definition and command handling

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::{
    CompletionsCommand, FilterCommand, InitCommand, MessageCommand, ShowCommand, ValidateCommand,
};

/// Countdown - Release configuration and failure triage
#[derive(Debug, Parser)]
#[command(name = "countdown")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Configuration file (skips discovery)
    #[arg(short, long, global = true, env = "COUNTDOWN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initialize a new Countdown configuration
    Init(InitCommand),

    /// Validate the release configuration
    Validate(ValidateCommand),

    /// Show branches, plugin pipeline and failure policy
    Show(ShowCommand),

    /// Render the git tag and release commit message
    Message(MessageCommand),

    /// Apply the failure policy to an engine error
    Filter(FilterCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        // Change to specified directory if provided
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Commands::Init(ref cmd) => cmd.execute(&self),
            Commands::Validate(ref cmd) => cmd.execute(&self),
            Commands::Show(ref cmd) => cmd.execute(&self),
            Commands::Message(ref cmd) => cmd.execute(&self),
            Commands::Filter(ref cmd) => cmd.execute(&self),
            Commands::Completions(ref cmd) => cmd.execute(&self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_filter_with_globals() {
        let cli = Cli::try_parse_from([
            "countdown",
            "--format",
            "json",
            "filter",
            "--input",
            "error.json",
            "--branch",
            "staging",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Filter(cmd) => {
                assert_eq!(cmd.input, Some(PathBuf::from("error.json")));
                assert_eq!(cmd.branch.as_deref(), Some("staging"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}

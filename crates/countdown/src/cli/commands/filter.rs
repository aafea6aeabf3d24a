//! Filter command

use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::{debug, info};

use countdown_core::config::{load_config, load_config_or_default, ReleaseConfig};
use countdown_core::hooks::{
    EngineError, FailureContext, FailureFilter, HookChain, ReleaseFailure,
};

use crate::cli::output;
use crate::cli::{Cli, OutputFormat};
use crate::exit_codes;

use super::exit_on_config_error;

/// Apply the failure policy to an engine error
#[derive(Debug, Args)]
pub struct FilterCommand {
    /// JSON file holding the engine error (reads stdin when omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Branch the release ran on
    #[arg(short, long)]
    pub branch: Option<String>,

    /// The release was a dry run
    #[arg(long)]
    pub dry_run: bool,
}

/// Outcome of running the hooks over one engine error
#[derive(Debug)]
struct FilterOutcome {
    /// Records before filtering
    reported: usize,
    /// What remains; `None` means the release succeeds
    remaining: Option<ReleaseFailure>,
}

impl FilterOutcome {
    fn ignored(&self) -> usize {
        let kept = self.remaining.as_ref().map_or(0, |f| f.errors().len());
        self.reported.saturating_sub(kept)
    }
}

impl FilterCommand {
    /// Execute the filter command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(input = ?self.input, branch = ?self.branch, "executing filter command");

        let raw = match self.input {
            Some(ref path) => std::fs::read_to_string(path)?,
            None => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            }
        };
        let engine: EngineError = serde_json::from_str(&raw)?;
        debug!(name = %engine.name, aggregate = engine.is_aggregate(), "parsed engine error");

        let config = self.config(cli)?;
        let outcome = self.run(&config, engine);

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "success": outcome.remaining.is_none(),
                    "ignored": outcome.ignored(),
                    "error": outcome.remaining.clone().map(EngineError::from),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => print_outcome(cli, &outcome),
        }

        if outcome.remaining.is_some() {
            std::process::exit(exit_codes::RELEASE_FAILED);
        }

        Ok(())
    }

    /// An explicit `--config` must load; otherwise discovery falls back to defaults
    fn config(&self, cli: &Cli) -> anyhow::Result<ReleaseConfig> {
        match cli.config {
            Some(ref path) => Ok(exit_on_config_error(load_config(path))),
            None => Ok(load_config_or_default(&std::env::current_dir()?).0),
        }
    }

    fn run(&self, config: &ReleaseConfig, engine: EngineError) -> FilterOutcome {
        let failure = ReleaseFailure::from(engine);
        let reported = failure.errors().len();

        let mut context = FailureContext::for_failure(&failure).with_dry_run(self.dry_run);
        if let Some(ref branch) = self.branch {
            context = context.with_branch(branch.clone());
        }

        let mut chain = HookChain::new();
        chain.register(Box::new(FailureFilter::from_config(&config.on_error)));

        let remaining = chain.run(failure, &context);
        info!(
            reported,
            success = remaining.is_none(),
            hooks = ?chain.names(),
            "failure hooks finished"
        );

        FilterOutcome { reported, remaining }
    }
}

fn print_outcome(cli: &Cli, outcome: &FilterOutcome) {
    match outcome.remaining {
        None => {
            if !cli.quiet {
                output::success(&format!(
                    "Release can proceed: {} ignorable error(s) dropped",
                    outcome.ignored()
                ));
            }
        }
        Some(ref failure) => {
            output::error(&format!("Release failed: {}", failure));
            if cli.quiet {
                return;
            }
            for record in failure.errors() {
                println!("  {} {}", style("✗").red(), record);
            }
            if outcome.ignored() > 0 {
                output::info(&format!("{} ignorable error(s) dropped", outcome.ignored()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use countdown_core::config::PathMatch;

    fn command() -> FilterCommand {
        FilterCommand {
            input: None,
            branch: Some("main".to_string()),
            dry_run: false,
        }
    }

    fn engine(json: &str) -> EngineError {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_run_all_ignorable() {
        let outcome = command().run(
            &ReleaseConfig::default(),
            engine(
                r#"{"name": "AggregateError", "errors": [
                    {"type": "NOT_FOUND", "path": ["issue", "update"]},
                    {"type": "NOT_FOUND", "path": ["pullRequest"]}
                ]}"#,
            ),
        );
        assert!(outcome.remaining.is_none());
        assert_eq!(outcome.reported, 2);
        assert_eq!(outcome.ignored(), 2);
    }

    #[test]
    fn test_run_keeps_significant() {
        let outcome = command().run(
            &ReleaseConfig::default(),
            engine(
                r#"{"name": "AggregateError", "errors": [
                    {"type": "NOT_FOUND", "path": ["issue", "comment"]},
                    {"type": "NOT_FOUND", "path": ["tag"]}
                ]}"#,
            ),
        );
        let remaining = outcome.remaining.as_ref().unwrap();
        assert_eq!(remaining.errors().len(), 1);
        assert_eq!(remaining.errors()[0].path, vec!["tag"]);
        assert_eq!(outcome.ignored(), 1);
    }

    #[test]
    fn test_run_respects_configured_path_match() {
        let mut config = ReleaseConfig::default();
        config.on_error.path_match = PathMatch::Word;
        let outcome = command().run(
            &config,
            engine(
                r#"{"name": "AggregateError", "errors": [
                    {"type": "NOT_FOUND", "path": ["branch", "protection"]}
                ]}"#,
            ),
        );
        assert!(outcome.remaining.is_some());
    }

    #[test]
    fn test_run_singular_untouched() {
        let input = engine(r#"{"name": "FetchError", "message": "socket hang up", "code": "ECONNRESET"}"#);
        let outcome = command().run(&ReleaseConfig::default(), input.clone());
        let remaining = outcome.remaining.unwrap();
        assert_eq!(EngineError::from(remaining), input);
    }
}

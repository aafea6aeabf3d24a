//! CLI commands

mod completions;
mod filter;
mod init;
mod message;
mod show;
mod validate;

pub use completions::CompletionsCommand;
pub use filter::FilterCommand;
pub use init::InitCommand;
pub use message::MessageCommand;
pub use show::ShowCommand;
pub use validate::ValidateCommand;

use std::path::PathBuf;

use countdown_core::config::{load_config, load_config_from_dir, ReleaseConfig};

use crate::cli::{output, Cli};
use crate::exit_codes;

/// Load the configuration named by `--config`, or discover it from the
/// working directory. Exits with a config error when none can be loaded.
fn require_config(cli: &Cli) -> anyhow::Result<(ReleaseConfig, PathBuf)> {
    let loaded = match cli.config {
        Some(ref path) => load_config(path).map(|config| (config, path.clone())),
        None => load_config_from_dir(&std::env::current_dir()?),
    };

    Ok(exit_on_config_error(loaded))
}

/// Unwrap a configuration result, exiting with the config error code on failure
fn exit_on_config_error<T>(result: countdown_core::Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            output::error(&format!("Configuration: {}", e));
            std::process::exit(exit_codes::CONFIG_ERROR);
        }
    }
}

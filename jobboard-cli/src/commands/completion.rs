//! Module for generating shell completion scripts for the CLI.

use std::io;

use anyhow::{Result, anyhow};
use clap::CommandFactory;
use clap_complete::{generate, shells::Shell};

/// Writes the completion script for `shell` to stdout.
///
/// # Errors
/// Returns an error for unknown shell names.
pub fn generate_completion(shell: &str) -> Result<()> {
    let shell = shell
        .parse::<Shell>()
        .map_err(|err| anyhow!("invalid shell type `{shell}`: {err}"))?;
    let mut app = crate::Cli::command();
    generate(shell, &mut app, "jobboard", &mut io::stdout());
    Ok(())
}

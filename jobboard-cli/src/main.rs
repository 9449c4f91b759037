//! Main entry point for the job board CLI.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenv::dotenv;

mod commands;
mod logging;
mod storage;

use commands::applications::ApplicationsCommand;
use commands::jobs::JobsCommand;

/// Job board CLI
#[derive(Parser, Debug)]
#[command(name = "jobboard")]
#[command(about = "Command-line client for the job board", long_about = None)]
pub struct Cli {
    /// Path to the configuration file (optional)
    #[arg(
        long,
        short,
        global = true,
        help = "Path to the configuration file (e.g., jobboard.yaml, .json or .toml). If not provided, defaults and JOBBOARD_* variables are used."
    )]
    config: Option<PathBuf>,

    /// Base URL of the API, overriding the configuration
    #[arg(
        long,
        global = true,
        help = "Base URL of the API (e.g., https://jobs.example.com/api). Overrides the configuration file and environment."
    )]
    api_url: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true, help = "Print results as JSON instead of tables")]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the job board CLI
#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and store the session
    Login {
        /// Account email; prompted for when omitted
        #[arg(long, short, help = "Account email. Prompted for when omitted.")]
        email: Option<String>,
    },

    /// Sign out and remove the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Browse and save jobs
    #[command(subcommand)]
    Jobs(JobsCommand),

    /// Manage your job applications
    #[command(subcommand)]
    Applications(ApplicationsCommand),

    /// Generate shell completion scripts for the CLI
    Completion {
        /// The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)
        #[arg(
            long,
            short,
            help = "The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)"
        )]
        shell: String,
    },

    /// Print a default configuration file
    Config {
        /// Format of the configuration (yaml, json or toml). Defaults to yaml.
        #[arg(
            long,
            short,
            help = "Format of the configuration (yaml, json or toml). Defaults to yaml."
        )]
        format: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Completion { shell } => commands::completion::generate_completion(&shell),
        Commands::Config { format } => {
            commands::config::print_default_config(format.as_deref().unwrap_or("yaml"))
        }
        Commands::Login { email } => {
            let session = commands::Session::open(cli.config, cli.api_url)?;
            commands::session::login(&session, email).await
        }
        Commands::Logout => {
            let session = commands::Session::open(cli.config, cli.api_url)?;
            commands::session::logout(&session).await;
            Ok(())
        }
        Commands::Whoami => {
            let session = commands::Session::open(cli.config, cli.api_url)?;
            commands::session::whoami(&session, cli.json).await
        }
        Commands::Jobs(command) => {
            let session = commands::Session::open(cli.config, cli.api_url)?;
            commands::jobs::run(&session, command, cli.json).await
        }
        Commands::Applications(command) => {
            let session = commands::Session::open(cli.config, cli.api_url)?;
            commands::applications::run(&session, command, cli.json).await
        }
    }
}

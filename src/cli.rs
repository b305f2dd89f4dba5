//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use monorepo_split::config;
use monorepo_split::logging;

use crate::commands;

/// Split a monorepo into standalone GitHub repositories, preserving history
///
/// Without a subcommand, runs `split`. Settings are read from the
/// environment and from a `.env` file in the current directory.
#[derive(Parser, Debug)]
#[command(name = "monorepo-split")]
#[command(version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    split: commands::split::SplitArgs,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace); defaults to RUST_LOG, then info
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    /// File that log output is appended to
    #[arg(long, global = true, value_name = "PATH", default_value = logging::DEFAULT_LOG_FILE)]
    log_file: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create one repository per branch or project and push its history
    Split(commands::split::SplitArgs),

    /// Force-push freshly filtered history into existing project repositories
    ForceUpdate(commands::force_update::ForceUpdateArgs),

    /// Check prerequisites, configuration and GitHub access
    Check(commands::check::CheckArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let command = match self.command {
            // Completion scripts go to stdout untouched by logging.
            Some(Commands::Completions(args)) => return commands::completions::execute(args),
            Some(command) => command,
            None => Commands::Split(self.split),
        };

        let dotenv = config::load_dotenv();
        logging::init(self.log_level.as_deref(), &self.log_file)?;
        dotenv.log();

        match command {
            Commands::Split(args) => commands::split::execute(args, &self.color),
            Commands::ForceUpdate(args) => commands::force_update::execute(args, &self.color),
            Commands::Check(args) => commands::check::execute(args, &self.color),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

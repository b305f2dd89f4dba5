//! # Split Command Implementation
//!
//! Runs a full split: load configuration, create or reuse one repository per
//! target, push each target's extracted history, and report the result.
//!
//! Failures of individual targets are reported in the summary but do not
//! change the exit status; only configuration errors and a failed mirror
//! clone do.

use anyhow::{Context, Result};
use clap::Args;

use monorepo_split::config::{Mode, SplitConfig};
use monorepo_split::orchestrator::Splitter;
use monorepo_split::output::{render_summary, OutputConfig};

/// Split the monorepo into one repository per branch or project
#[derive(Args, Debug, Default)]
pub struct SplitArgs {
    /// Perform a dry run without making changes
    #[arg(long)]
    pub dry_run: bool,

    /// Splitting mode; a non-empty MODE environment variable takes precedence
    #[arg(long, value_enum, default_value_t = Mode::Branch)]
    pub mode: Mode,
}

/// Execute the `split` command.
pub fn execute(args: SplitArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);

    let config =
        SplitConfig::from_env(args.mode, args.dry_run).context("Invalid configuration")?;
    let splitter = Splitter::new(config)?;

    let summary = splitter.run().map_err(|e| {
        log::error!("Error during repository splitting: {}", e);
        e
    })?;

    summary.log();
    print!("{}", render_summary(&out, &summary));
    Ok(())
}

//! # Force-Update Command Implementation
//!
//! Maintenance pathway for repositories that already exist: every project
//! (and the common library) is filtered again from the current source and
//! force-pushed to `main`, overwriting what the destination has. No hosting
//! API call is made; clone URLs are derived from `GITHUB_HOST` and `ORG`.
//!
//! Only project mode is supported. When `MODE` is unset the command assumes
//! project mode.

use anyhow::{Context, Result};
use clap::Args;

use monorepo_split::config::{Mode, SplitConfig};
use monorepo_split::orchestrator::Splitter;
use monorepo_split::output::{render_summary, OutputConfig};

/// Force-push freshly filtered history into existing project repositories
#[derive(Args, Debug)]
pub struct ForceUpdateArgs {
    /// Show what would be pushed without cloning or pushing
    #[arg(long)]
    pub dry_run: bool,
}

/// Execute the `force-update` command.
pub fn execute(args: ForceUpdateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);

    let config =
        SplitConfig::from_env(Mode::Project, args.dry_run).context("Invalid configuration")?;
    let splitter = Splitter::new(config)?;

    let summary = splitter.force_update().map_err(|e| {
        log::error!("Error during force update: {}", e);
        e
    })?;

    summary.log();
    print!("{}", render_summary(&out, &summary));
    Ok(())
}

//! # Check Command Implementation
//!
//! Read-only diagnostics to run before a split:
//!
//! - **Prerequisites**: `git` and `git filter-repo` are installed.
//! - **Configuration**: the environment (and `.env`) describe a valid run.
//! - **GitHub access**: the token authenticates against the configured API.
//!
//! Every check is reported; the command fails if any of them did.

use std::env;
use std::path::Path;

use anyhow::Result;
use clap::Args;

use monorepo_split::command::ProcessRunner;
use monorepo_split::config::{self, Mode, SplitConfig};
use monorepo_split::git::Git;
use monorepo_split::hosting::{GitHubClient, HostingApi, Owner};
use monorepo_split::output::{Mark, OutputConfig};

/// Check prerequisites, configuration and GitHub access
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Mode to validate the configuration for; MODE takes precedence
    #[arg(long, value_enum, default_value_t = Mode::Branch)]
    pub mode: Mode,

    /// Skip the GitHub connectivity check
    #[arg(long)]
    pub offline: bool,
}

/// Execute the `check` command.
pub fn execute(args: CheckArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let cwd = env::current_dir()?;
    let runner = ProcessRunner;
    let git = Git::new(&runner);
    let mut failures = 0;

    match git.version(&cwd) {
        Ok(version) => println!("{} {}", out.mark(Mark::Ok), version),
        Err(e) => {
            failures += 1;
            println!("{} git is not available: {}", out.mark(Mark::Err), e);
        }
    }

    let project_mode = matches!(
        config::resolve_mode(args.mode, env::var(config::ENV_MODE).ok().as_deref()),
        Ok(Mode::Project)
    );
    match git.filter_repo_version(&cwd) {
        Ok(version) => println!("{} git-filter-repo {}", out.mark(Mark::Ok), version),
        Err(_) if project_mode => {
            failures += 1;
            println!(
                "{} git-filter-repo is not installed (needed for project mode)",
                out.mark(Mark::Err)
            );
        }
        Err(_) => println!(
            "{} git-filter-repo is not installed (only needed for project mode and COMMON_PATH)",
            out.mark(Mark::Warn)
        ),
    }

    if Path::new(".env").is_file() {
        println!("{} Found .env in {}", out.mark(Mark::Info), cwd.display());
    } else {
        println!(
            "{} No .env file; using the process environment only",
            out.mark(Mark::Info)
        );
    }

    let config = match SplitConfig::from_env(args.mode, true) {
        Ok(config) => {
            println!(
                "{} Configuration valid: {} mode, targets: {}",
                out.mark(Mark::Ok),
                config.mode(),
                config.targets.names().join(", ")
            );
            if let Some(common) = &config.common_path {
                println!("   common libraries: {}", common);
            }
            Some(config)
        }
        Err(e) => {
            failures += 1;
            println!("{} {}", out.mark(Mark::Err), e);
            None
        }
    };

    match (&config, args.offline) {
        (Some(config), false) => {
            let result = GitHubClient::new(&config.hosting.api_url, &config.token)
                .and_then(|client| client.authenticated_user());
            match result {
                Ok(login) => {
                    println!(
                        "{} Authenticated to {} as {}",
                        out.mark(Mark::Ok),
                        config.hosting.api_url,
                        login
                    );
                    if let Owner::Organization(org) = Owner::parse(&config.org) {
                        println!("   repositories will be created in organization {}", org);
                    }
                }
                Err(e) => {
                    failures += 1;
                    println!("{} GitHub check failed: {}", out.mark(Mark::Err), e);
                }
            }
        }
        (Some(_), true) => println!("{} Skipping GitHub check (offline)", out.mark(Mark::Warn)),
        (None, _) => {}
    }

    if failures > 0 {
        anyhow::bail!("{} check(s) failed", failures);
    }
    println!("{} Ready to split", out.mark(Mark::Ok));
    Ok(())
}

//! # Monorepo Split Library
//!
//! This library splits a git monorepo into standalone hosted repositories,
//! keeping each piece's history. It is designed to be used by the
//! `monorepo-split` command-line tool, but the orchestration is exposed so
//! other tools can drive a split with their own command runner or hosting
//! client.
//!
//! ## Quick Example
//!
//! ```
//! use monorepo_split::config::{Mode, SplitConfig};
//!
//! let vars = [
//!     ("SOURCE_REPO_URL", "git@github.com:acme/monorepo.git"),
//!     ("MODE", "project"),
//!     ("PROJECTS", "fractol, printf"),
//!     ("COMMON_PATH", "libft"),
//!     ("ORG", "acme"),
//!     ("GITHUB_TOKEN", "ghp_example"),
//! ];
//! let lookup = |key: &str| {
//!     vars.iter()
//!         .find(|(k, _)| *k == key)
//!         .map(|(_, v)| v.to_string())
//! };
//!
//! let config = SplitConfig::from_lookup(Mode::Branch, true, lookup).unwrap();
//! assert_eq!(config.mode(), Mode::Project);
//!
//! let names: Vec<String> = config
//!     .targets
//!     .extraction_targets()
//!     .iter()
//!     .chain(config.common_target().iter())
//!     .map(|t| t.repo_name())
//!     .collect();
//! assert_eq!(names, ["fractol-app", "printf-app", "common-libs"]);
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: Reads and validates environment settings
//!   into a [`config::SplitConfig`] whose target list always matches the mode.
//! - **Targets (`target`)**: One branch, project directory, or common library
//!   path, and the repository name derived from it.
//! - **Command execution (`command`, `git`)**: Every external process runs in
//!   an explicit directory behind the [`command::CommandRunner`] trait.
//! - **Hosting (`hosting`, `provision`)**: GitHub REST calls behind the
//!   [`hosting::HostingApi`] trait, plus the create-or-reuse policy.
//! - **Extraction (`extract`)**: The git sequences that turn a slice of the
//!   mirror into a history on `main` and push it.
//! - **Orchestration (`orchestrator`)**: Runs the whole split, isolating
//!   per-target failures and producing a [`orchestrator::RunSummary`].
//!
//! ## Execution Flow
//!
//! 1.  **Load**: Build the configuration from the environment.
//! 2.  **Mirror**: Clone the source as a bare mirror into a temporary area.
//! 3.  **Analyze**: Report files shared by all targets.
//! 4.  **Process**: Provision a repository for each target and push its
//!     extracted history.
//! 5.  **Common libraries**: Same, for the shared-library directory.
//! 6.  **Summarize**: Report what was created, skipped and failed.

pub mod analysis;
pub mod command;
pub mod config;
pub mod error;
pub mod extract;
pub mod git;
pub mod hosting;
pub mod logging;
pub mod orchestrator;
pub mod output;
pub mod provision;
pub mod target;
pub mod workspace;

#[cfg(test)]
mod list_proptest;

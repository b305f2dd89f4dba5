//! # Configuration Loading
//!
//! The splitter is configured entirely through environment variables
//! (optionally seeded from a `.env` file in the working directory). This
//! module reads them, validates them, and produces a [`SplitConfig`] whose
//! shape already encodes the mode: a branch-mode config carries only branch
//! names and a project-mode config carries only project paths.
//!
//! ## Mode precedence
//!
//! The `--mode` command-line flag defaults to `branch`. A non-empty `MODE`
//! environment variable overrides whatever the command line says, so the
//! environment always wins over the flag.
//!
//! ## Variables
//!
//! | Variable          | Required            | Meaning                              |
//! |-------------------|---------------------|--------------------------------------|
//! | `SOURCE_REPO_URL` | yes                 | Monorepo to split                    |
//! | `MODE`            | no                  | `branch` or `project`                |
//! | `BRANCHES`        | in branch mode      | Comma-separated branch names         |
//! | `PROJECTS`        | in project mode     | Comma-separated project directories  |
//! | `COMMON_PATH`     | no                  | Shared-library directory             |
//! | `ORG`             | yes                 | Owner of the new repositories        |
//! | `GITHUB_TOKEN`    | yes                 | API credential                       |
//! | `GITHUB_API_URL`  | no                  | REST API base URL                    |
//! | `GITHUB_HOST`     | no                  | Web host used for clone URLs         |

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use secrecy::SecretString;

use crate::error::{Error, Result};
use crate::target::ExtractionTarget;

pub const ENV_SOURCE_REPO_URL: &str = "SOURCE_REPO_URL";
pub const ENV_MODE: &str = "MODE";
pub const ENV_BRANCHES: &str = "BRANCHES";
pub const ENV_PROJECTS: &str = "PROJECTS";
pub const ENV_COMMON_PATH: &str = "COMMON_PATH";
pub const ENV_ORG: &str = "ORG";
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_GITHUB_API_URL: &str = "GITHUB_API_URL";
pub const ENV_GITHUB_HOST: &str = "GITHUB_HOST";

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_WEB_HOST: &str = "github.com";

/// How the monorepo is carved up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Mode {
    /// One repository per branch of the monorepo
    #[default]
    Branch,
    /// One repository per top-level project directory on the default branch
    Project,
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "branch" => Ok(Mode::Branch),
            "project" => Ok(Mode::Project),
            other => Err(Error::Config {
                message: format!("MODE must be either 'branch' or 'project', got '{}'", other),
                hint: None,
            }),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Branch => write!(f, "branch"),
            Mode::Project => write!(f, "project"),
        }
    }
}

/// The mode-specific target list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Targets {
    Branches(Vec<String>),
    Projects(Vec<String>),
}

impl Targets {
    pub fn mode(&self) -> Mode {
        match self {
            Targets::Branches(_) => Mode::Branch,
            Targets::Projects(_) => Mode::Project,
        }
    }

    pub fn names(&self) -> &[String] {
        match self {
            Targets::Branches(names) | Targets::Projects(names) => names,
        }
    }

    /// Expand into extraction targets, in configured order.
    pub fn extraction_targets(&self) -> Vec<ExtractionTarget> {
        match self {
            Targets::Branches(names) => names.iter().map(ExtractionTarget::branch).collect(),
            Targets::Projects(names) => names.iter().map(ExtractionTarget::project).collect(),
        }
    }
}

/// Where the hosting service lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostingSettings {
    /// Base URL of the REST API
    pub api_url: String,
    /// Host used to build clone URLs without asking the API
    pub web_host: String,
}

impl Default for HostingSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            web_host: DEFAULT_WEB_HOST.to_string(),
        }
    }
}

/// Validated splitter configuration.
#[derive(Debug)]
pub struct SplitConfig {
    pub source_url: String,
    pub targets: Targets,
    pub common_path: Option<String>,
    pub org: String,
    pub token: SecretString,
    pub dry_run: bool,
    pub hosting: HostingSettings,
}

impl SplitConfig {
    /// Load configuration from the process environment.
    pub fn from_env(cli_mode: Mode, dry_run: bool) -> Result<Self> {
        Self::from_lookup(cli_mode, dry_run, |key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Validation order matches what users see first: mode, then source URL,
    /// org, credential, and finally the mode-specific target list.
    pub fn from_lookup<F>(cli_mode: Mode, dry_run: bool, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = resolve_mode(cli_mode, lookup(ENV_MODE).as_deref())?;

        let source_url = required(&lookup, ENV_SOURCE_REPO_URL)?;
        let org = required(&lookup, ENV_ORG)?;
        let token = required(&lookup, ENV_GITHUB_TOKEN)?;

        let targets = match mode {
            Mode::Branch => {
                let branches = parse_list(&lookup(ENV_BRANCHES).unwrap_or_default());
                if branches.is_empty() {
                    return Err(Error::Config {
                        message: "BRANCHES is required for branch mode".to_string(),
                        hint: Some("Set BRANCHES to a comma-separated list of branch names".to_string()),
                    });
                }
                Targets::Branches(branches)
            }
            Mode::Project => {
                let projects = parse_list(&lookup(ENV_PROJECTS).unwrap_or_default());
                if projects.is_empty() {
                    return Err(Error::Config {
                        message: "PROJECTS is required for project mode".to_string(),
                        hint: Some("Set PROJECTS to a comma-separated list of directories".to_string()),
                    });
                }
                Targets::Projects(projects)
            }
        };

        let common_path = lookup(ENV_COMMON_PATH)
            .map(|p| p.trim().trim_end_matches('/').to_string())
            .filter(|p| !p.is_empty());

        let hosting = HostingSettings {
            api_url: non_empty(lookup(ENV_GITHUB_API_URL))
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            web_host: non_empty(lookup(ENV_GITHUB_HOST))
                .unwrap_or_else(|| DEFAULT_WEB_HOST.to_string()),
        };

        Ok(Self {
            source_url,
            targets,
            common_path,
            org,
            token: SecretString::new(token.into_boxed_str()),
            dry_run,
            hosting,
        })
    }

    pub fn mode(&self) -> Mode {
        self.targets.mode()
    }

    /// The shared-library target, when a common path is configured.
    pub fn common_target(&self) -> Option<ExtractionTarget> {
        self.common_path.as_deref().map(ExtractionTarget::common)
    }
}

/// Pick the effective mode: a non-empty `MODE` value beats the CLI flag.
pub fn resolve_mode(cli_mode: Mode, env_mode: Option<&str>) -> Result<Mode> {
    match env_mode.map(str::trim).filter(|m| !m.is_empty()) {
        Some(value) => value.parse(),
        None => Ok(cli_mode),
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
///
/// Order is preserved and duplicates are kept.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// What [`load_dotenv`] found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DotenvOutcome {
    Loaded(PathBuf),
    Missing,
    Unreadable(String),
}

impl DotenvOutcome {
    /// Report the outcome; call once the logger is installed.
    pub fn log(&self) {
        match self {
            DotenvOutcome::Loaded(path) => {
                log::debug!("Loaded environment from {}", path.display())
            }
            DotenvOutcome::Missing => {}
            DotenvOutcome::Unreadable(e) => log::warn!("Ignoring unreadable .env file: {}", e),
        }
    }
}

/// Seed the process environment from `./.env` if present.
///
/// Variables that are already set are left alone. Runs before the logger is
/// installed so `RUST_LOG` may come from the file; the outcome is returned
/// for logging afterwards.
pub fn load_dotenv() -> DotenvOutcome {
    match dotenvy::dotenv() {
        Ok(path) => DotenvOutcome::Loaded(path),
        Err(e) if e.not_found() => DotenvOutcome::Missing,
        Err(e) => DotenvOutcome::Unreadable(e.to_string()),
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup(key)).ok_or_else(|| Error::config(format!("{} is required", key)))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

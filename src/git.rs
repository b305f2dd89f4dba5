//! Typed wrappers over the git subcommands the splitter needs.
//!
//! This uses the system git command, which automatically handles:
//! - SSH keys from ~/.ssh/
//! - Git credential helpers
//! - Personal access tokens
//! - Any authentication configured in ~/.gitconfig
//!
//! Every method takes the repository (or parent) directory it operates in;
//! nothing relies on the process-wide current directory.

use std::path::Path;

use crate::command::{Check, CommandOutput, CommandRunner};
use crate::error::Result;

/// Branch every extracted repository is published on.
pub const MAIN_BRANCH: &str = "main";
/// Scratch branch used while normalizing a branch extraction.
pub const TEMP_BRANCH: &str = "temp_branch";
/// Remote name used for both the mirror and the destination.
pub const ORIGIN: &str = "origin";

/// How `main` is pushed to the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushMode {
    /// `push -u`: plain push that sets up upstream tracking
    Track,
    /// `push -f`: overwrite whatever the destination has
    Force,
}

/// Git driver bound to a command runner.
pub struct Git<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> Git<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    fn git(&self, args: &[&str], cwd: &Path) -> Result<CommandOutput> {
        self.runner.run("git", args, cwd, Check::Fail)
    }

    fn probe(&self, args: &[&str], cwd: &Path) -> Result<CommandOutput> {
        self.runner.run("git", args, cwd, Check::Allow)
    }

    /// `git --version`, trimmed.
    pub fn version(&self, cwd: &Path) -> Result<String> {
        Ok(self.git(&["--version"], cwd)?.stdout.trim().to_string())
    }

    /// `git filter-repo --version`, trimmed.
    pub fn filter_repo_version(&self, cwd: &Path) -> Result<String> {
        Ok(self
            .git(&["filter-repo", "--version"], cwd)?
            .stdout
            .trim()
            .to_string())
    }

    /// Bare mirror clone of `url` into `dest`, run from `cwd`.
    pub fn clone_mirror(&self, url: &str, dest: &Path, cwd: &Path) -> Result<()> {
        let dest = dest.to_string_lossy();
        self.git(&["clone", "--mirror", url, &dest], cwd)?;
        Ok(())
    }

    /// Plain clone of a local repository into `dest`, run from `cwd`.
    pub fn clone_local(&self, source: &Path, dest: &Path, cwd: &Path) -> Result<()> {
        let source = source.to_string_lossy();
        let dest = dest.to_string_lossy();
        self.git(&["clone", &source, &dest], cwd)?;
        Ok(())
    }

    pub fn fetch(&self, repo: &Path, remote: &str) -> Result<()> {
        self.git(&["fetch", remote], repo)?;
        Ok(())
    }

    /// Switch to `branch`, creating it from `origin/<branch>` if needed.
    ///
    /// The trailing `--` makes git read `branch` as a revision even when a
    /// path of the same name exists in the working tree.
    pub fn checkout(&self, repo: &Path, branch: &str) -> Result<()> {
        self.git(&["checkout", branch, "--"], repo)?;
        Ok(())
    }

    /// Create `branch` at the current position and switch to it.
    pub fn checkout_new_branch(&self, repo: &Path, branch: &str) -> Result<()> {
        self.git(&["checkout", "-b", branch], repo)?;
        Ok(())
    }

    /// Whether a local branch named `branch` exists.
    pub fn branch_exists(&self, repo: &Path, branch: &str) -> Result<bool> {
        let output = self.git(&["branch", "--list", branch], repo)?;
        Ok(!output.stdout.trim().is_empty())
    }

    pub fn delete_branch(&self, repo: &Path, branch: &str) -> Result<()> {
        self.git(&["branch", "-D", branch], repo)?;
        Ok(())
    }

    pub fn rename_branch(&self, repo: &Path, from: &str, to: &str) -> Result<()> {
        self.git(&["branch", "-m", from, to], repo)?;
        Ok(())
    }

    /// Names of configured remotes.
    pub fn remotes(&self, repo: &Path) -> Result<Vec<String>> {
        let output = self.git(&["remote"], repo)?;
        Ok(non_empty_lines(&output.stdout))
    }

    pub fn has_remote(&self, repo: &Path, name: &str) -> Result<bool> {
        Ok(self.remotes(repo)?.iter().any(|r| r == name))
    }

    pub fn remove_remote(&self, repo: &Path, name: &str) -> Result<()> {
        self.git(&["remote", "remove", name], repo)?;
        Ok(())
    }

    pub fn add_remote(&self, repo: &Path, name: &str, url: &str) -> Result<()> {
        self.git(&["remote", "add", name, url], repo)?;
        Ok(())
    }

    pub fn push(&self, repo: &Path, remote: &str, branch: &str, mode: PushMode) -> Result<()> {
        let flag = match mode {
            PushMode::Track => "-u",
            PushMode::Force => "-f",
        };
        self.git(&["push", flag, remote, branch], repo)?;
        Ok(())
    }

    /// Rewrite history to keep only `subdir/`, moved to the repository root.
    ///
    /// filter-repo refuses to rewrite a clone it does not consider fresh,
    /// which a local clone never is, hence `--force`.
    pub fn filter_to_subdirectory(&self, repo: &Path, subdir: &str) -> Result<()> {
        let prefix = format!("{}/", subdir.trim_end_matches('/'));
        let rename = format!("{}:", prefix);
        self.git(
            &["filter-repo", "--path", &prefix, "--path-rename", &rename, "--force"],
            repo,
        )?;
        Ok(())
    }

    /// Whether `reference` resolves in `repo`.
    pub fn ref_exists(&self, repo: &Path, reference: &str) -> Result<bool> {
        let output = self.probe(&["rev-parse", "--verify", "--quiet", reference], repo)?;
        Ok(output.success())
    }

    /// Files tracked in `treeish`, optionally limited to `pathspec`.
    pub fn list_files(&self, repo: &Path, treeish: &str, pathspec: Option<&str>) -> Result<Vec<String>> {
        let mut args = vec!["ls-tree", "-r", "--name-only", treeish];
        if let Some(spec) = pathspec {
            args.push("--");
            args.push(spec);
        }
        let output = self.git(&args, repo)?;
        Ok(non_empty_lines(&output.stdout))
    }
}

fn non_empty_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

//! # External Command Execution
//!
//! Every side effect the splitter has on repositories goes through an external
//! process (`git`, `git filter-repo`). This module owns that boundary.
//!
//! The [`CommandRunner`] trait is the seam: [`ProcessRunner`] spawns real
//! processes, while tests substitute a recording implementation that answers
//! with canned output. Every call names its working directory explicitly; the
//! process-wide current directory is never consulted or changed, so nothing
//! here depends on hidden global state.

use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};

/// What to do when a command exits non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Turn a non-zero exit into [`Error::Command`]
    Fail,
    /// Hand the output back to the caller regardless of exit status
    Allow,
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was terminated by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Trait for running external commands - allows mocking in tests
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` inside `cwd`, blocking until it exits.
    fn run(&self, program: &str, args: &[&str], cwd: &Path, check: Check)
        -> Result<CommandOutput>;
}

/// The default implementation of `CommandRunner`, backed by
/// `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: &Path,
        check: Check,
    ) -> Result<CommandOutput> {
        let command_line = command_line(program, args);
        log::debug!("Running `{}` in {}", command_line, cwd.display());

        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .output()
            .map_err(|e| Error::Command {
                command: command_line.clone(),
                status: None,
                stderr: e.to_string(),
            })?;

        let output = CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        finish(command_line, output, check)
    }
}

/// Render a command line for logs and error messages.
pub fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Apply the `check` policy to a finished command.
pub(crate) fn finish(command_line: String, output: CommandOutput, check: Check) -> Result<CommandOutput> {
    if check == Check::Fail && !output.success() {
        log::error!("Command failed: {}", command_line);
        log::error!("Error: {}", output.stderr.trim());
        return Err(Error::Command {
            command: command_line,
            status: output.status,
            stderr: output.stderr.trim().to_string(),
        });
    }
    Ok(output)
}

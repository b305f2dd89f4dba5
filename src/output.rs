//! # Output Configuration
//!
//! Controls how the CLI decorates what it prints for humans: the run summary
//! and the `check` report. Log lines are never decorated.
//!
//! ## Respecting User Preferences
//!
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Usage
//!
//! ```rust,ignore
//! use monorepo_split::output::{Mark, OutputConfig};
//!
//! let out = OutputConfig::from_env_and_flag("auto");
//! println!("{} git found", out.mark(Mark::Ok));
//! ```

use std::env;
use std::fmt::Write as _;

use crate::orchestrator::RunSummary;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `color_flag` is the value of `--color`: `always` forces decoration on
    /// (overriding `NO_COLOR`), `never` forces it off, anything else detects
    /// terminal support.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // The presence of NO_COLOR (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    pub fn mark(&self, mark: Mark) -> &'static str {
        let (fancy, plain) = mark.pair();
        emoji(self, fancy, plain)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Status prefixes used in human-facing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Ok,
    Warn,
    Err,
    Info,
    Dry,
}

impl Mark {
    fn pair(self) -> (&'static str, &'static str) {
        match self {
            Mark::Ok => ("✅", "[OK]"),
            Mark::Warn => ("⚠️", "[WARN]"),
            Mark::Err => ("❌", "[ERR]"),
            Mark::Info => ("📦", "[INFO]"),
            Mark::Dry => ("🔍", "[DRY RUN]"),
        }
    }
}

/// Returns the emoji when colors are enabled, otherwise the plain text.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// Human-readable summary of a split or force-update run.
pub fn render_summary(out: &OutputConfig, summary: &RunSummary) -> String {
    let mut text = String::new();

    let _ = writeln!(
        text,
        "{} Created {} repositories",
        out.mark(Mark::Info),
        summary.created.len()
    );
    for record in &summary.created {
        let _ = writeln!(text, "   {} ({})", record.name, record.clone_url);
    }

    let _ = writeln!(text, "Targets: {}", summary.intended.join(", "));

    for issue in &summary.skipped {
        let _ = writeln!(
            text,
            "{} Skipped {}: {}",
            out.mark(Mark::Warn),
            issue.repo_name,
            issue.reason
        );
    }
    for issue in &summary.failed {
        let _ = writeln!(
            text,
            "{} Failed {}: {}",
            out.mark(Mark::Err),
            issue.repo_name,
            issue.reason
        );
    }

    if summary.dry_run {
        let _ = writeln!(
            text,
            "{} This was a dry run - no actual changes were made",
            out.mark(Mark::Dry)
        );
    } else if summary.is_clean() {
        let _ = writeln!(text, "{} All targets processed", out.mark(Mark::Ok));
    }

    text
}

//! # Error Handling
//!
//! This module defines the centralized error type for the `monorepo-split`
//! library. It uses `thiserror` to describe every failure the splitter can
//! surface, with enough context (command line, stderr, URL, status) to tell
//! the user what went wrong without re-running with debug logging.
//!
//! ## Key Components
//!
//! - **`Error`**: The enum of all failure modes.
//! - **`Result<T>`**: Alias for `std::result::Result<T, Error>`.
//!
//! Conditions that drive control flow rather than signal failure are not
//! errors here: a repository that does not exist yet is `Ok(None)` from the
//! hosting API, a missing branch is `false` from the git driver, and a project
//! directory that is absent from the tree is `Extraction::Skipped`.

use thiserror::Error;

/// Main error type for monorepo-split operations
#[derive(Error, Debug)]
pub enum Error {
    /// Required settings are missing or invalid.
    ///
    /// Always raised before any mutating action is taken.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Config {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// An external command exited non-zero or could not be started.
    #[error("Command failed: {command} (exit: {}) - {stderr}", status.map(|s| s.to_string()).unwrap_or_else(|| "none".to_string()))]
    Command {
        command: String,
        /// Exit code, `None` when the process never ran or was killed by a signal
        status: Option<i32>,
        stderr: String,
    },

    /// The hosting API answered with a status the caller did not expect.
    #[error("Hosting API error: {url} returned {status} - {message}")]
    Api {
        url: String,
        status: u16,
        message: String,
    },

    /// A transport-level failure talking to the hosting API.
    #[error("Network operation error: {url} - {message}")]
    Network { url: String, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON decoding error, wrapped from `serde_json::Error`.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Shorthand for a configuration error without a hint.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            hint: None,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

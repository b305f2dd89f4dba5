//! # Monorepo Split CLI
//!
//! This is the binary entry point for the `monorepo-split` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Setting up logging and loading `.env`.
//! - Executing the appropriate command and translating top-level errors into
//!   a non-zero exit status.
//!
//! The splitting logic lives in the `monorepo_split` library crate; the binary
//! is a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}

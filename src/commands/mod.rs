//! # CLI Command Implementations
//!
//! Each subcommand of `monorepo-split` lives in its own file with an `Args`
//! struct derived using `clap` and an `execute` function that calls into the
//! `monorepo_split` library.

pub mod check;
pub mod completions;
pub mod force_update;
pub mod split;

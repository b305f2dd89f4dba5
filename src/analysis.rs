//! Common-file analysis over the source mirror.
//!
//! Informational only: lists the files every target shares so the operator
//! can spot candidates for the common library. Nothing downstream depends on
//! the result.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::command::CommandRunner;
use crate::config::Targets;
use crate::error::Result;
use crate::git::Git;

/// How many shared files the report prints.
pub const REPORTED_FILES: usize = 10;

/// Files per target, and the files all targets have in common.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonFileReport {
    pub files_by_target: BTreeMap<String, BTreeSet<String>>,
    pub common: BTreeSet<String>,
}

impl CommonFileReport {
    fn from_targets(files_by_target: BTreeMap<String, BTreeSet<String>>) -> Self {
        let mut sets = files_by_target.values();
        let common = match sets.next() {
            Some(first) => sets.fold(first.clone(), |acc, set| {
                acc.intersection(set).cloned().collect()
            }),
            None => BTreeSet::new(),
        };
        Self {
            files_by_target,
            common,
        }
    }

    /// Log the shared files; a single target has nothing to compare against.
    pub fn log(&self, mode_label: &str) {
        if self.files_by_target.len() < 2 {
            log::info!(
                "Fewer than two {} to compare, no common file report",
                mode_label
            );
            return;
        }
        log::info!(
            "Found {} common files across all {}",
            self.common.len(),
            mode_label
        );
        for file in self.common.iter().take(REPORTED_FILES) {
            log::info!("  - {}", file);
        }
    }
}

/// Collect file listings for every target from the bare mirror at `mirror`.
///
/// Branches missing from the mirror are left out of the comparison.
pub fn analyze_common_files(
    runner: &dyn CommandRunner,
    mirror: &Path,
    targets: &Targets,
) -> Result<CommonFileReport> {
    log::info!("Analyzing common files...");
    let git = Git::new(runner);
    let mut files_by_target = BTreeMap::new();

    match targets {
        Targets::Branches(branches) => {
            for branch in branches {
                let reference = format!("refs/heads/{}", branch);
                if !git.ref_exists(mirror, &reference)? {
                    log::debug!("Branch '{}' not in mirror, leaving it out", branch);
                    continue;
                }
                let files = git.list_files(mirror, &reference, None)?;
                files_by_target.insert(branch.clone(), files.into_iter().collect());
            }
        }
        Targets::Projects(projects) => {
            for project in projects {
                let prefix = format!("{}/", project.trim_end_matches('/'));
                let files = git
                    .list_files(mirror, "HEAD", Some(&prefix))?
                    .into_iter()
                    .filter_map(|f| f.strip_prefix(&prefix).map(str::to_string))
                    .collect();
                files_by_target.insert(project.clone(), files);
            }
        }
    }

    Ok(CommonFileReport::from_targets(files_by_target))
}

//! # History Extraction
//!
//! Turns one slice of the source mirror into a standalone history on `main`
//! and pushes it to a destination URL.
//!
//! Two sequences exist:
//!
//! - **Branch**: clone the mirror, check out the branch, move it onto `main`
//!   (replacing any `main` the clone already has), point `origin` at the
//!   destination and push with upstream tracking.
//! - **Subdirectory** (projects and the common library): clone the mirror,
//!   confirm the directory exists, filter history down to it with
//!   `git filter-repo`, make sure `main` exists, point `origin` at the
//!   destination and push, either tracking or forced.
//!
//! Preconditions are checked before destructive steps: `main` is deleted only
//! after `git branch --list` has shown it exists, and `origin` is removed
//! only if `git remote` lists it.

use std::fs;
use std::path::PathBuf;

use crate::command::CommandRunner;
use crate::error::Result;
use crate::git::{Git, PushMode, MAIN_BRANCH, ORIGIN, TEMP_BRANCH};
use crate::target::ExtractionTarget;
use crate::workspace::WorkingArea;

/// Outcome of extracting one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// History was pushed to the destination
    Pushed,
    /// Nothing to extract; the run should move on
    Skipped { reason: String },
    /// Dry run: no command was issued
    DryRun,
}

pub struct Extractor<'a> {
    git: Git<'a>,
    area: &'a WorkingArea,
    dry_run: bool,
}

impl<'a> Extractor<'a> {
    pub fn new(runner: &'a dyn CommandRunner, area: &'a WorkingArea, dry_run: bool) -> Self {
        Self {
            git: Git::new(runner),
            area,
            dry_run,
        }
    }

    /// Extract `target` into `url`, picking the sequence by target kind.
    ///
    /// Branch targets always push with tracking; `mode` applies to
    /// subdirectory targets.
    pub fn extract(&self, target: &ExtractionTarget, url: &str, mode: PushMode) -> Result<Extraction> {
        if target.is_subdirectory() {
            self.extract_subdirectory(target, url, mode)
        } else {
            self.extract_branch(target, url)
        }
    }

    /// Rewrite a whole branch onto `main` and push it.
    pub fn extract_branch(&self, target: &ExtractionTarget, url: &str) -> Result<Extraction> {
        let branch = target.name.as_str();
        log::info!(
            "Extracting branch '{}' to repository '{}'",
            branch,
            target.repo_name()
        );
        if self.dry_run {
            return Ok(Extraction::DryRun);
        }

        let workdir = self.fresh_clone(target)?;
        let git = &self.git;

        git.fetch(&workdir, ORIGIN)?;
        git.checkout(&workdir, branch)?;
        git.checkout_new_branch(&workdir, TEMP_BRANCH)?;
        git.delete_branch(&workdir, branch)?;

        if git.branch_exists(&workdir, MAIN_BRANCH)? {
            log::info!("Main branch already exists, removing it first");
            git.delete_branch(&workdir, MAIN_BRANCH)?;
        }
        git.rename_branch(&workdir, TEMP_BRANCH, MAIN_BRANCH)?;

        git.remove_remote(&workdir, ORIGIN)?;
        git.add_remote(&workdir, ORIGIN, url)?;
        git.push(&workdir, ORIGIN, MAIN_BRANCH, PushMode::Track)?;

        log::info!(
            "Successfully extracted branch '{}' to '{}'",
            branch,
            target.repo_name()
        );
        Ok(Extraction::Pushed)
    }

    /// Filter history down to a subdirectory and push it.
    pub fn extract_subdirectory(
        &self,
        target: &ExtractionTarget,
        url: &str,
        mode: PushMode,
    ) -> Result<Extraction> {
        let subdir = target.name.as_str();
        log::info!(
            "Extracting {} to repository '{}'",
            target,
            target.repo_name()
        );
        if self.dry_run {
            return Ok(Extraction::DryRun);
        }

        let workdir = self.fresh_clone(target)?;
        let git = &self.git;

        if !workdir.join(subdir).is_dir() {
            log::warn!("Project directory '{}' not found in repository", subdir);
            return Ok(Extraction::Skipped {
                reason: format!("directory '{}' not found in repository", subdir),
            });
        }

        git.filter_to_subdirectory(&workdir, subdir)?;

        if !git.branch_exists(&workdir, MAIN_BRANCH)? {
            log::info!("No main branch found after filtering, creating one");
            git.checkout_new_branch(&workdir, MAIN_BRANCH)?;
        }

        if git.has_remote(&workdir, ORIGIN)? {
            git.remove_remote(&workdir, ORIGIN)?;
        }
        git.add_remote(&workdir, ORIGIN, url)?;
        git.push(&workdir, ORIGIN, MAIN_BRANCH, mode)?;

        log::info!(
            "Successfully extracted {} to '{}'",
            target,
            target.repo_name()
        );
        Ok(Extraction::Pushed)
    }

    /// Clone the mirror into the target's working directory, replacing any
    /// leftover from an earlier target with the same name.
    fn fresh_clone(&self, target: &ExtractionTarget) -> Result<PathBuf> {
        let workdir = self.area.workdir(target);
        if workdir.exists() {
            fs::remove_dir_all(&workdir)?;
        }
        self.git
            .clone_local(&self.area.mirror_path(), &workdir, self.area.root())?;
        Ok(workdir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::testing::{failed, ok, RecordingRunner};
    use crate::command::CommandOutput;
    use crate::error::Error;
    use std::path::Path;
    use tempfile::TempDir;

    fn touch_dir(path: &Path) {
        fs::create_dir_all(path).unwrap();
    }

    /// Responder that materializes cloned directories (plus `subdirs` inside
    /// them) and answers `branch --list main` / `remote` from the flags.
    fn fake_git(
        subdirs: &'static [&'static str],
        main_exists: bool,
        has_origin: bool,
    ) -> impl Fn(&[&str], &Path) -> CommandOutput + Send + Sync + 'static {
        move |args: &[&str], _: &Path| match args {
            ["clone", _, dest] => {
                let dest = Path::new(dest);
                touch_dir(dest);
                for sub in subdirs {
                    touch_dir(&dest.join(sub));
                }
                ok("")
            }
            ["branch", "--list", "main"] if main_exists => ok("  main\n"),
            ["remote"] if has_origin => ok("origin\n"),
            _ => ok(""),
        }
    }

    fn setup() -> (TempDir, WorkingArea) {
        let parent = TempDir::new().unwrap();
        let area = WorkingArea::create_in(parent.path()).unwrap();
        (parent, area)
    }

    #[test]
    fn test_branch_sequence_without_existing_main() {
        let (_parent, area) = setup();
        let runner = RecordingRunner::with_responder(fake_git(&[], false, true));
        let extractor = Extractor::new(&runner, &area, false);

        let outcome = extractor
            .extract_branch(&ExtractionTarget::branch("web"), "https://github.com/acme/web-app.git")
            .unwrap();

        assert_eq!(outcome, Extraction::Pushed);
        let workdir = area.workdir(&ExtractionTarget::branch("web"));
        let lines = runner.lines();
        assert_eq!(
            lines[0],
            format!(
                "clone {} {}",
                area.mirror_path().display(),
                workdir.display()
            )
        );
        assert_eq!(
            &lines[1..],
            &[
                "fetch origin",
                "checkout web --",
                "checkout -b temp_branch",
                "branch -D web",
                "branch --list main",
                "branch -m temp_branch main",
                "remote remove origin",
                "remote add origin https://github.com/acme/web-app.git",
                "push -u origin main",
            ]
        );

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls[0].cwd, area.root());
        assert!(calls[1..].iter().all(|c| c.cwd == workdir));
    }

    #[test]
    fn test_branch_sequence_replaces_existing_main() {
        let (_parent, area) = setup();
        let runner = RecordingRunner::with_responder(fake_git(&[], true, true));
        let extractor = Extractor::new(&runner, &area, false);

        extractor
            .extract_branch(&ExtractionTarget::branch("web"), "url")
            .unwrap();

        let lines = runner.lines();
        let list = lines.iter().position(|l| l == "branch --list main").unwrap();
        assert_eq!(lines[list + 1], "branch -D main");
        assert_eq!(lines[list + 2], "branch -m temp_branch main");
    }

    #[test]
    fn test_branch_failure_stops_before_push() {
        let (_parent, area) = setup();
        let runner = RecordingRunner::with_responder(|args, cwd| match args {
            ["branch", "-m", ..] => failed("fatal: unable to lock ref"),
            _ => fake_git(&[], false, true)(args, cwd),
        });
        let extractor = Extractor::new(&runner, &area, false);

        let err = extractor
            .extract_branch(&ExtractionTarget::branch("web"), "url")
            .unwrap_err();

        assert!(matches!(err, Error::Command { .. }));
        assert_eq!(runner.lines().last().unwrap(), "branch -m temp_branch main");
    }

    #[test]
    fn test_project_sequence() {
        let (_parent, area) = setup();
        let runner = RecordingRunner::with_responder(fake_git(&["printf"], false, false));
        let extractor = Extractor::new(&runner, &area, false);

        let outcome = extractor
            .extract_subdirectory(
                &ExtractionTarget::project("printf"),
                "https://github.com/acme/printf-app.git",
                PushMode::Track,
            )
            .unwrap();

        assert_eq!(outcome, Extraction::Pushed);
        assert_eq!(
            &runner.lines()[1..],
            &[
                "filter-repo --path printf/ --path-rename printf/: --force",
                "branch --list main",
                "checkout -b main",
                "remote",
                "remote add origin https://github.com/acme/printf-app.git",
                "push -u origin main",
            ]
        );
    }

    #[test]
    fn test_force_update_keeps_existing_main_and_removes_origin() {
        let (_parent, area) = setup();
        let runner = RecordingRunner::with_responder(fake_git(&["libft"], true, true));
        let extractor = Extractor::new(&runner, &area, false);

        extractor
            .extract(&ExtractionTarget::common("libft"), "url", PushMode::Force)
            .unwrap();

        assert_eq!(
            &runner.lines()[1..],
            &[
                "filter-repo --path libft/ --path-rename libft/: --force",
                "branch --list main",
                "remote",
                "remote remove origin",
                "remote add origin url",
                "push -f origin main",
            ]
        );
    }

    #[test]
    fn test_missing_project_directory_is_skipped() {
        let (_parent, area) = setup();
        let runner = RecordingRunner::with_responder(fake_git(&["printf"], false, false));
        let extractor = Extractor::new(&runner, &area, false);

        let outcome = extractor
            .extract_subdirectory(&ExtractionTarget::project("fractol"), "url", PushMode::Track)
            .unwrap();

        assert!(matches!(outcome, Extraction::Skipped { .. }));
        // Only the clone ran: no filter, no push.
        assert_eq!(runner.lines().len(), 1);
    }

    #[test]
    fn test_nested_common_path() {
        let (_parent, area) = setup();
        let runner = RecordingRunner::with_responder(fake_git(&["libs/libft"], true, false));
        let extractor = Extractor::new(&runner, &area, false);

        let outcome = extractor
            .extract(&ExtractionTarget::common("libs/libft"), "url", PushMode::Track)
            .unwrap();

        assert_eq!(outcome, Extraction::Pushed);
        assert!(runner
            .lines()
            .contains(&"filter-repo --path libs/libft/ --path-rename libs/libft/: --force".to_string()));
    }

    #[test]
    fn test_dry_run_issues_no_commands() {
        let (_parent, area) = setup();
        let runner = RecordingRunner::succeeding();
        let extractor = Extractor::new(&runner, &area, true);

        assert_eq!(
            extractor
                .extract(&ExtractionTarget::branch("web"), "url", PushMode::Track)
                .unwrap(),
            Extraction::DryRun
        );
        assert_eq!(
            extractor
                .extract(&ExtractionTarget::project("api"), "url", PushMode::Track)
                .unwrap(),
            Extraction::DryRun
        );
        assert!(runner.lines().is_empty());
    }

    #[test]
    fn test_leftover_workdir_is_replaced() {
        let (_parent, area) = setup();
        let target = ExtractionTarget::project("printf");
        let stale = area.workdir(&target);
        fs::create_dir_all(stale.join("stale")).unwrap();

        let runner = RecordingRunner::with_responder(fake_git(&["printf"], true, false));
        let extractor = Extractor::new(&runner, &area, false);
        extractor
            .extract_subdirectory(&target, "url", PushMode::Track)
            .unwrap();

        assert!(!stale.join("stale").exists());
    }
}

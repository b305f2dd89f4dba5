//! # Run Orchestration
//!
//! Drives one complete run over a validated [`SplitConfig`]:
//!
//! 1. Create the working area.
//! 2. Mirror-clone the source (skipped in dry run).
//! 3. Report files shared by all targets (skipped in dry run, best-effort).
//! 4. For each target: provision its repository, then extract into it.
//! 5. Do the same for the common library, when configured.
//! 6. Return a [`RunSummary`].
//!
//! Steps 1 and 2 are fatal on failure. A failure inside step 4 or 5 only
//! affects that target: it is logged, recorded in the summary, and the loop
//! moves on.
//!
//! [`Splitter::force_update`] is the maintenance pathway: it re-filters every
//! project and force-pushes into repositories that are assumed to exist,
//! without talking to the hosting API.

use std::path::PathBuf;

use crate::analysis::analyze_common_files;
use crate::command::{CommandRunner, ProcessRunner};
use crate::config::{Mode, SplitConfig};
use crate::error::{Error, Result};
use crate::extract::{Extraction, Extractor};
use crate::git::{Git, PushMode};
use crate::hosting::{GitHubClient, HostingApi, Owner};
use crate::provision::{Provisioner, RepositoryRecord};
use crate::target::ExtractionTarget;
use crate::workspace::WorkingArea;

/// A target that did not make it, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetIssue {
    pub repo_name: String,
    pub reason: String,
}

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Repositories created by this run
    pub created: Vec<RepositoryRecord>,
    /// Every destination repository name, in processing order
    pub intended: Vec<String>,
    pub failed: Vec<TargetIssue>,
    pub skipped: Vec<TargetIssue>,
    pub dry_run: bool,
}

impl RunSummary {
    fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// Write the end-of-run report to the log.
    pub fn log(&self) {
        let rule = "=".repeat(50);
        log::info!("{}", rule);
        log::info!("REPOSITORY SPLITTING COMPLETED");
        log::info!("{}", rule);
        log::info!("Created {} repositories:", self.created.len());
        for record in &self.created {
            log::info!("  - {}", record.name);
        }
        log::info!("Targets processed: {}", self.intended.join(", "));
        for issue in &self.skipped {
            log::warn!("Skipped {}: {}", issue.repo_name, issue.reason);
        }
        for issue in &self.failed {
            log::error!("Failed {}: {}", issue.repo_name, issue.reason);
        }
        if self.dry_run {
            log::info!("This was a dry run - no actual changes were made");
        }
    }
}

/// Runs a split or force-update over one configuration.
pub struct Splitter {
    config: SplitConfig,
    runner: Box<dyn CommandRunner>,
    api: Box<dyn HostingApi>,
    work_parent: Option<PathBuf>,
}

impl Splitter {
    /// Splitter backed by system git and the configured GitHub API.
    pub fn new(config: SplitConfig) -> Result<Self> {
        let api = GitHubClient::new(&config.hosting.api_url, &config.token)?;
        Ok(Self::with_operations(
            config,
            Box::new(ProcessRunner),
            Box::new(api),
        ))
    }

    /// Splitter with custom operations (for testing)
    pub fn with_operations(
        config: SplitConfig,
        runner: Box<dyn CommandRunner>,
        api: Box<dyn HostingApi>,
    ) -> Self {
        Self {
            config,
            runner,
            api,
            work_parent: None,
        }
    }

    /// Create working areas under `parent` instead of the system temp dir.
    pub fn work_in(mut self, parent: impl Into<PathBuf>) -> Self {
        self.work_parent = Some(parent.into());
        self
    }

    /// Split the monorepo into one repository per target.
    pub fn run(&self) -> Result<RunSummary> {
        let config = &self.config;
        log::info!("Starting repository splitting in {} mode", config.mode());
        if config.dry_run {
            log::info!("DRY RUN MODE - No changes will be made");
        }

        let area = self.prepare_area()?;

        if !config.dry_run {
            let label = match config.mode() {
                Mode::Branch => "branches",
                Mode::Project => "projects",
            };
            match analyze_common_files(self.runner.as_ref(), &area.mirror_path(), &config.targets) {
                Ok(report) => report.log(label),
                Err(e) => log::warn!("Common file analysis failed: {}", e),
            }
        }

        let mut provisioner = Provisioner::new(
            self.api.as_ref(),
            Owner::parse(&config.org),
            &config.hosting.web_host,
            config.dry_run,
        );
        let extractor = Extractor::new(self.runner.as_ref(), &area, config.dry_run);
        let mut summary = RunSummary::new(config.dry_run);

        for target in config.targets.extraction_targets() {
            log::info!("Processing {}: {}", target.kind, target.name);
            process_target(&mut provisioner, &extractor, &target, &mut summary);
        }

        match config.common_target() {
            Some(target) => {
                log::info!("Processing common libraries from: {}", target.name);
                process_target(&mut provisioner, &extractor, &target, &mut summary);
            }
            None => log::info!("No common path configured, skipping common libraries"),
        }

        summary.created = provisioner.into_created();
        Ok(summary)
    }

    /// Re-filter every project (and the common library) and force-push it
    /// into its existing repository.
    pub fn force_update(&self) -> Result<RunSummary> {
        let config = &self.config;
        if config.mode() != Mode::Project {
            return Err(Error::Config {
                message: "force-update only supports project mode".to_string(),
                hint: Some("Set MODE=project and list the directories in PROJECTS".to_string()),
            });
        }

        log::info!("Starting force update of existing repositories");
        if config.dry_run {
            log::info!("DRY RUN MODE - No changes will be made");
        }

        let area = self.prepare_area()?;
        let owner = Owner::parse(&config.org);
        let extractor = Extractor::new(self.runner.as_ref(), &area, config.dry_run);
        let mut summary = RunSummary::new(config.dry_run);

        let targets = config
            .targets
            .extraction_targets()
            .into_iter()
            .chain(config.common_target());

        for target in targets {
            let repo = target.repo_name();
            let url = format!(
                "https://{}/{}/{}.git",
                config.hosting.web_host,
                owner.login(),
                repo
            );
            log::info!("Force updating {} into {}", target, url);
            summary.intended.push(repo.clone());
            record_extraction(
                extractor.extract(&target, &url, PushMode::Force),
                &target,
                &mut summary,
            );
        }

        Ok(summary)
    }

    /// Create the working area and, outside dry run, mirror the source into it.
    fn prepare_area(&self) -> Result<WorkingArea> {
        let area = match &self.work_parent {
            Some(parent) => WorkingArea::create_in(parent)?,
            None => WorkingArea::create()?,
        };

        if !self.config.dry_run {
            log::info!("Cloning source repository: {}", self.config.source_url);
            Git::new(self.runner.as_ref()).clone_mirror(
                &self.config.source_url,
                &area.mirror_path(),
                area.root(),
            )?;
        }

        Ok(area)
    }
}

fn process_target(
    provisioner: &mut Provisioner<'_>,
    extractor: &Extractor<'_>,
    target: &ExtractionTarget,
    summary: &mut RunSummary,
) {
    let repo = target.repo_name();
    summary.intended.push(repo.clone());

    let Some(url) = provisioner.provision(&repo, &target.description()) else {
        log::error!("Failed to create repository for {}: {}", target.kind, target.name);
        summary.failed.push(TargetIssue {
            repo_name: repo,
            reason: "repository could not be created".to_string(),
        });
        return;
    };

    if record_extraction(extractor.extract(target, &url, PushMode::Track), target, summary) {
        log::info!("Repository URL: {}", url);
    }
}

/// Fold one extraction outcome into the summary; `true` if history was
/// pushed or would have been.
fn record_extraction(
    outcome: Result<Extraction>,
    target: &ExtractionTarget,
    summary: &mut RunSummary,
) -> bool {
    let repo_name = target.repo_name();
    match outcome {
        Ok(Extraction::Pushed) | Ok(Extraction::DryRun) => true,
        Ok(Extraction::Skipped { reason }) => {
            summary.skipped.push(TargetIssue { repo_name, reason });
            false
        }
        Err(e) => {
            log::error!("Failed to extract {}: {}", target, e);
            summary.failed.push(TargetIssue {
                repo_name,
                reason: e.to_string(),
            });
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::testing::{failed, ok, RecordingRunner};
    use crate::config::{HostingSettings, Targets};
    use crate::provision::testing::MockHostingApi;
    use secrecy::SecretString;
    use std::fs;
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    fn config(targets: Targets, common_path: Option<&str>, dry_run: bool) -> SplitConfig {
        SplitConfig {
            source_url: "git@github.com:acme/monorepo.git".to_string(),
            targets,
            common_path: common_path.map(str::to_string),
            org: "acme".to_string(),
            token: SecretString::new("ghp_test".into()),
            dry_run,
            hosting: HostingSettings::default(),
        }
    }

    fn projects(names: &[&str]) -> Targets {
        Targets::Projects(names.iter().map(|n| n.to_string()).collect())
    }

    /// Shares the runner's and API's call logs with the test after the
    /// splitter has taken ownership of them.
    struct Harness {
        splitter: Splitter,
        commands: Arc<Mutex<Vec<crate::command::testing::Invocation>>>,
        api_calls: Arc<Mutex<Vec<String>>>,
        parent: TempDir,
    }

    fn harness(config: SplitConfig, runner: RecordingRunner, api: MockHostingApi) -> Harness {
        let parent = TempDir::new().unwrap();
        let commands = Arc::clone(&runner.calls);
        let api_calls = Arc::clone(&api.calls);
        let splitter = Splitter::with_operations(config, Box::new(runner), Box::new(api))
            .work_in(parent.path());
        Harness {
            splitter,
            commands,
            api_calls,
            parent,
        }
    }

    /// Runner that fakes clones, materializing `dirs` inside every working
    /// clone, and fails any command whose args contain `fail_on`.
    fn fake_git(dirs: &'static [&'static str], fail_on: Option<&'static str>) -> RecordingRunner {
        RecordingRunner::with_responder(move |args, _| {
            if let Some(needle) = fail_on {
                if args.iter().any(|a| a.contains(needle)) {
                    return failed("remote: Permission denied");
                }
            }
            match args {
                ["clone", "--mirror", ..] => ok(""),
                ["clone", _, dest] => {
                    for dir in dirs {
                        fs::create_dir_all(Path::new(dest).join(dir)).unwrap();
                    }
                    ok("")
                }
                _ => ok(""),
            }
        })
    }

    #[test]
    fn test_dry_run_project_mode_end_to_end() {
        let h = harness(
            config(projects(&["fractol", "printf"]), Some("libft"), true),
            RecordingRunner::succeeding(),
            MockHostingApi::default(),
        );

        let summary = h.splitter.run().unwrap();

        assert_eq!(summary.intended, vec!["fractol-app", "printf-app", "common-libs"]);
        assert!(summary.created.is_empty());
        assert!(summary.failed.is_empty());
        assert!(summary.dry_run);
        assert!(h.commands.lock().unwrap().is_empty());
        assert!(h.api_calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_project_run_creates_and_extracts_each_target() {
        let h = harness(
            config(projects(&["fractol", "printf"]), Some("libft"), false),
            fake_git(&["fractol", "printf", "libft"], None),
            MockHostingApi::default(),
        );

        let summary = h.splitter.run().unwrap();

        let created: Vec<_> = summary.created.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(created, vec!["fractol-app", "printf-app", "common-libs"]);
        assert!(summary.is_clean());

        let pushes: Vec<_> = h
            .commands
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.line())
            .filter(|l| l.starts_with("push"))
            .collect();
        assert_eq!(pushes.len(), 3);
        assert!(pushes.iter().all(|l| l == "push -u origin main"));
    }

    #[test]
    fn test_missing_project_is_skipped_and_run_continues() {
        let h = harness(
            config(projects(&["fractol", "ghost", "printf"]), None, false),
            fake_git(&["fractol", "printf"], None),
            MockHostingApi::default(),
        );

        let summary = h.splitter.run().unwrap();

        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].repo_name, "ghost-app");
        assert!(summary.failed.is_empty());
        let filters = h
            .commands
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.args.first().map(String::as_str) == Some("filter-repo"))
            .count();
        assert_eq!(filters, 2);
    }

    #[test]
    fn test_extraction_failure_is_isolated_to_its_target() {
        let h = harness(
            config(projects(&["fractol", "printf"]), None, false),
            fake_git(&["fractol", "printf"], Some("fractol-app")),
            MockHostingApi::default(),
        );

        let summary = h.splitter.run().unwrap();

        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].repo_name, "fractol-app");
        assert!(summary.failed[0].reason.contains("git remote add"));
        assert_eq!(summary.intended, vec!["fractol-app", "printf-app"]);
        assert!(h
            .commands
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.line() == "remote add origin https://github.com/octocat/printf-app.git"));
    }

    #[test]
    fn test_provisioning_failure_skips_extraction() {
        let mut api = MockHostingApi::default();
        api.fail_create.insert("web-app".to_string());
        let h = harness(
            config(Targets::Branches(vec!["web".into(), "api".into()]), None, false),
            fake_git(&[], None),
            api,
        );

        let summary = h.splitter.run().unwrap();

        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].repo_name, "web-app");
        let lines: Vec<_> = h.commands.lock().unwrap().iter().map(|c| c.line()).collect();
        assert!(!lines.contains(&"checkout web --".to_string()));
        assert!(lines.contains(&"checkout api --".to_string()));
    }

    #[test]
    fn test_existing_repository_is_reused() {
        let h = harness(
            config(Targets::Branches(vec!["web".into()]), None, false),
            fake_git(&[], None),
            MockHostingApi::with_existing(&["web-app"]),
        );

        let summary = h.splitter.run().unwrap();

        assert!(summary.created.is_empty());
        assert!(summary.is_clean());
        assert_eq!(
            *h.api_calls.lock().unwrap(),
            vec!["get acme/web-app".to_string()]
        );
    }

    #[test]
    fn test_mirror_clone_failure_is_fatal() {
        let h = harness(
            config(Targets::Branches(vec!["web".into()]), None, false),
            fake_git(&[], Some("--mirror")),
            MockHostingApi::default(),
        );

        let err = h.splitter.run().unwrap_err();

        assert!(matches!(err, Error::Command { .. }));
        assert!(h.api_calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_analysis_failure_is_not_fatal() {
        let h = harness(
            config(projects(&["printf"]), None, false),
            fake_git(&["printf"], Some("ls-tree")),
            MockHostingApi::default(),
        );

        let summary = h.splitter.run().unwrap();
        assert!(summary.is_clean());
        assert_eq!(summary.created.len(), 1);
    }

    #[test]
    fn test_working_area_removed_after_run() {
        let h = harness(
            config(projects(&["printf"]), None, false),
            fake_git(&["printf"], None),
            MockHostingApi::default(),
        );

        h.splitter.run().unwrap();

        let leftovers = fs::read_dir(h.parent.path()).unwrap().count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_force_update_requires_project_mode() {
        let h = harness(
            config(Targets::Branches(vec!["web".into()]), None, false),
            RecordingRunner::succeeding(),
            MockHostingApi::default(),
        );

        let err = h.splitter.force_update().unwrap_err();
        assert!(err.to_string().contains("project mode"));
        assert!(h.commands.lock().unwrap().is_empty());
    }

    #[test]
    fn test_force_update_pushes_without_api_calls() {
        let h = harness(
            config(projects(&["printf"]), Some("libft/"), false),
            fake_git(&["printf", "libft"], None),
            MockHostingApi::default(),
        );

        let summary = h.splitter.force_update().unwrap();

        assert_eq!(summary.intended, vec!["printf-app", "common-libs"]);
        assert!(summary.is_clean());
        assert!(h.api_calls.lock().unwrap().is_empty());
        let lines: Vec<_> = h.commands.lock().unwrap().iter().map(|c| c.line()).collect();
        assert!(lines.contains(&"remote add origin https://github.com/acme/common-libs.git".to_string()));
        assert_eq!(
            lines.iter().filter(|l| *l == "push -f origin main").count(),
            2
        );
    }

    #[test]
    fn test_summary_log_mentions_dry_run() {
        testing_logger::setup();
        let summary = RunSummary {
            intended: vec!["web-app".to_string()],
            dry_run: true,
            ..RunSummary::default()
        };

        summary.log();

        testing_logger::validate(|captured_logs| {
            let bodies: Vec<_> = captured_logs.iter().map(|l| l.body.as_str()).collect();
            assert!(bodies.contains(&"REPOSITORY SPLITTING COMPLETED"));
            assert!(bodies.contains(&"Created 0 repositories:"));
            assert!(bodies.contains(&"This was a dry run - no actual changes were made"));
        });
    }
}

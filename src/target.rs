//! Extraction targets and the repository names derived from them.

use std::fmt;

/// Repository name used for the shared-library extraction.
pub const COMMON_REPO_NAME: &str = "common-libs";

/// What kind of slice of the monorepo a target is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// A whole branch, history rewritten onto `main`
    Branch,
    /// A project subdirectory, filtered to the repository root
    Project,
    /// The shared-library subdirectory
    Common,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Branch => write!(f, "branch"),
            TargetKind::Project => write!(f, "project"),
            TargetKind::Common => write!(f, "common libraries"),
        }
    }
}

/// A single unit of extraction: one source slice, one destination repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionTarget {
    /// Branch name, project directory, or common path
    pub name: String,
    pub kind: TargetKind,
}

impl ExtractionTarget {
    pub fn branch(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TargetKind::Branch,
        }
    }

    pub fn project(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TargetKind::Project,
        }
    }

    pub fn common(path: impl Into<String>) -> Self {
        Self {
            name: path.into(),
            kind: TargetKind::Common,
        }
    }

    /// Name of the destination repository.
    pub fn repo_name(&self) -> String {
        match self.kind {
            TargetKind::Common => COMMON_REPO_NAME.to_string(),
            TargetKind::Branch | TargetKind::Project => format!("{}-app", self.name),
        }
    }

    /// Description set on newly created repositories.
    pub fn description(&self) -> String {
        match self.kind {
            TargetKind::Branch => {
                format!("Application extracted from {} branch of monorepo", self.name)
            }
            TargetKind::Project => {
                format!("Application extracted from {} project of monorepo", self.name)
            }
            TargetKind::Common => format!("Common libraries extracted from {}", self.name),
        }
    }

    /// Directory name of this target's working clone inside the working area.
    ///
    /// Slashes are replaced so nested branch names stay a single path segment.
    pub fn workdir_name(&self) -> String {
        let safe = self.name.replace('/', "-");
        match self.kind {
            TargetKind::Branch => format!("branch_{}", safe),
            TargetKind::Project => format!("project_{}", safe),
            TargetKind::Common => "common_libs".to_string(),
        }
    }

    /// Whether extraction goes through the subdirectory history filter.
    pub fn is_subdirectory(&self) -> bool {
        matches!(self.kind, TargetKind::Project | TargetKind::Common)
    }
}

impl fmt::Display for ExtractionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.name)
    }
}

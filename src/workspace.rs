//! Scoped temporary working area for a run.
//!
//! The area holds one mirror clone of the source and one working clone per
//! target. It is removed when the [`WorkingArea`] is dropped, on every exit
//! path; removal errors are ignored.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::Result;
use crate::target::ExtractionTarget;

/// Directory name of the source mirror inside the area.
pub const SOURCE_MIRROR_DIR: &str = "source_repo";

const AREA_PREFIX: &str = "repo_splitter_";

#[derive(Debug)]
pub struct WorkingArea {
    dir: TempDir,
}

impl WorkingArea {
    /// Create the area under the system temporary directory.
    pub fn create() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix(AREA_PREFIX).tempdir()?;
        log::info!("Temporary directory: {}", dir.path().display());
        Ok(Self { dir })
    }

    /// Create the area under `parent`.
    pub fn create_in(parent: &Path) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(AREA_PREFIX)
            .tempdir_in(parent)?;
        log::info!("Temporary directory: {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn mirror_path(&self) -> PathBuf {
        self.root().join(SOURCE_MIRROR_DIR)
    }

    /// Where `target`'s working clone lives.
    pub fn workdir(&self, target: &ExtractionTarget) -> PathBuf {
        self.root().join(target.workdir_name())
    }
}

impl Drop for WorkingArea {
    fn drop(&mut self) {
        log::info!("Cleaning up temporary directory: {}", self.root().display());
    }
}

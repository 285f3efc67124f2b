//! Packaged chart living in a scratch directory
//!
//! The directory is owned by the `PackagedChart` and removed when it is
//! dropped, whichever way the push ends.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::archive::create_archive;
use crate::chart::LoadedChart;
use crate::error::Result;

const SCRATCH_PREFIX: &str = "helm-push-";

/// A chart archive written to a private temporary directory
#[derive(Debug)]
pub struct PackagedChart {
    dir: TempDir,
    path: PathBuf,
}

impl PackagedChart {
    /// Package `chart` into a fresh scratch directory
    pub fn create(chart: &LoadedChart) -> Result<Self> {
        let dir = tempfile::Builder::new().prefix(SCRATCH_PREFIX).tempdir()?;
        let path = create_archive(chart, dir.path())?;
        Ok(Self { dir, path })
    }

    /// Path of the `.tgz` archive
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base file name of the archive, as sent to the repository
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// The scratch directory holding the archive
    pub fn scratch_dir(&self) -> &Path {
        self.dir.path()
    }
}

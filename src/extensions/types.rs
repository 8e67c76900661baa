//! Extension build types
//!
//! A project declares one or more CMake extensions. Each becomes a
//! [`BuildTarget`], gets its own [`WorkingArea`], and produces a
//! [`BuildResult`] once both generator phases have succeeded.

use crate::error::{Error, Result};
use crate::process::ProcessStatus;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One declared extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    name: String,
    root_dir: PathBuf,
    defines: Vec<(String, String)>,
}

impl BuildTarget {
    /// Create a target from its dotted module name and source root.
    ///
    /// Relative roots are made absolute against the current directory.
    pub fn new(name: impl Into<String>, root_dir: impl AsRef<Path>) -> Self {
        let root_dir = root_dir.as_ref();
        let root_dir =
            std::path::absolute(root_dir).unwrap_or_else(|_| root_dir.to_path_buf());
        Self {
            name: name.into(),
            root_dir,
            defines: Vec::new(),
        }
    }

    /// Add a project-declared generator variable
    #[must_use]
    pub fn with_define(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defines.push((name.into(), value.into()));
        self
    }

    /// Module name, e.g. `oineus` or `pkg.native`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory holding the extension's `CMakeLists.txt`
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Extra generator variables, in declaration order
    pub fn defines(&self) -> &[(String, String)] {
        &self.defines
    }

    /// Fail with [`Error::TargetRootMissing`] unless the root is a directory
    pub fn verify(&self) -> Result<()> {
        if self.root_dir.is_dir() {
            Ok(())
        } else {
            Err(Error::TargetRootMissing {
                target: self.name.clone(),
                path: self.root_dir.clone(),
            })
        }
    }
}

/// Scratch directory used as the generator's working directory
///
/// Never shared between targets and never cleaned up here; stale build
/// trees are left for the caller to remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingArea {
    path: PathBuf,
}

impl WorkingArea {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Per-target area below the shared build-temp directory
    pub fn for_target(build_temp: &Path, target: &BuildTarget) -> Self {
        Self::new(build_temp.join(target.name()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the directory and any missing parents. Safe to repeat.
    pub fn ensure(&self) -> Result<()> {
        std::fs::create_dir_all(&self.path).map_err(|source| Error::WorkingArea {
            path: self.path.clone(),
            source,
        })
    }
}

/// Outcome of a successful configure + build of one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    /// Extension name
    pub target: String,

    /// Exit status of `cmake <root> -D...`
    pub configure: ProcessStatus,

    /// Exit status of `cmake --build . -j4`
    pub build: ProcessStatus,

    /// Wall time for both phases
    pub duration: Duration,
}

impl BuildResult {
    #[must_use]
    pub const fn success(&self) -> bool {
        self.configure.success() && self.build.success()
    }
}

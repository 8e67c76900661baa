//! Nested source dependency checkout
//!
//! The native library is vendored as git submodules. They must be present and
//! at their pinned commits before CMake is pointed at the tree.

use super::builder::Stage;
use super::types::BuildResult;
use crate::error::{Error, ProcessFailure, Result, StageKind};
use crate::process::{CommandRunner, Invocation};
use std::path::PathBuf;

/// Runs `git submodule update --init --recursive` in the project root
#[derive(Debug, Clone)]
pub struct DependencySynchronizer {
    project_root: PathBuf,
}

impl DependencySynchronizer {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    pub fn command(&self) -> Invocation {
        Invocation::new("git")
            .args(["submodule", "update", "--init", "--recursive"])
            .current_dir(&self.project_root)
    }

    pub fn synchronize(&self, runner: &dyn CommandRunner) -> Result<()> {
        let invocation = self.command();
        let cause = match runner.run(&invocation) {
            Ok(status) if status.success() => return Ok(()),
            Ok(status) => ProcessFailure::Exit(status),
            Err(source) => ProcessFailure::Launch(source),
        };

        Err(Error::DependencySyncFailure {
            command: invocation.command_line(),
            cause,
        })
    }
}

impl Stage for DependencySynchronizer {
    fn kind(&self) -> StageKind {
        StageKind::Synchronize
    }

    fn describe(&self) -> String {
        "Updating git submodules".to_string()
    }

    fn invocations(&self) -> Vec<(StageKind, Invocation)> {
        vec![(self.kind(), self.command())]
    }

    fn run(&self, runner: &dyn CommandRunner) -> Result<Option<BuildResult>> {
        self.synchronize(runner).map(|()| None)
    }
}

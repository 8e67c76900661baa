//! Error taxonomy for the extension build pipeline.
//!
//! Every variant is fatal to the run. The stage that failed is recoverable
//! with [`Error::stage`], and the child's exit status (when there was one)
//! with [`Error::process_status`].

use crate::process::ProcessStatus;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Pipeline stage a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// Input resolution before any stage runs
    Setup,
    /// Build generator presence check
    Validate,
    /// Nested source dependency checkout
    Synchronize,
    /// Generator configure phase
    Configure,
    /// Generator build phase
    Build,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Setup => "setup",
            Self::Validate => "toolchain check",
            Self::Synchronize => "dependency sync",
            Self::Configure => "configure",
            Self::Build => "build",
        })
    }
}

/// Why an external command did not succeed
#[derive(Debug, Error)]
pub enum ProcessFailure {
    #[error("exited with {0}")]
    Exit(ProcessStatus),

    #[error("could not be launched: {0}")]
    Launch(#[source] io::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("build generator `{program}` could not be launched; CMake must be installed to build: {targets}")]
    ToolchainMissing {
        program: String,
        targets: String,
        #[source]
        source: io::Error,
    },

    #[error("dependency sync failed running `{command}`")]
    DependencySyncFailure {
        command: String,
        #[source]
        cause: ProcessFailure,
    },

    #[error("configure phase failed for extension `{target}` running `{command}`")]
    ConfigureFailure {
        target: String,
        command: String,
        #[source]
        cause: ProcessFailure,
    },

    #[error("build phase failed for extension `{target}` running `{command}`")]
    BuildFailure {
        target: String,
        command: String,
        #[source]
        cause: ProcessFailure,
    },

    #[error("no interpreter found (searched {searched}); set PYTHON to an absolute path")]
    InterpreterNotFound { searched: String },

    #[error("root directory {} of extension `{target}` does not exist", path.display())]
    TargetRootMissing { target: String, path: PathBuf },

    #[error("extension `{name}` is declared more than once")]
    DuplicateTarget { name: String },

    #[error("failed to create working area {}", path.display())]
    WorkingArea {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Stage the failure happened in
    #[must_use]
    pub const fn stage(&self) -> StageKind {
        match self {
            Self::ToolchainMissing { .. } => StageKind::Validate,
            Self::DependencySyncFailure { .. } => StageKind::Synchronize,
            Self::ConfigureFailure { .. } | Self::WorkingArea { .. } => StageKind::Configure,
            Self::BuildFailure { .. } => StageKind::Build,
            Self::InterpreterNotFound { .. }
            | Self::TargetRootMissing { .. }
            | Self::DuplicateTarget { .. } => StageKind::Setup,
        }
    }

    /// Exit status of the failed child process, if it ran to completion
    #[must_use]
    pub const fn process_status(&self) -> Option<ProcessStatus> {
        match self {
            Self::DependencySyncFailure { cause, .. }
            | Self::ConfigureFailure { cause, .. }
            | Self::BuildFailure { cause, .. } => match cause {
                ProcessFailure::Exit(status) => Some(*status),
                ProcessFailure::Launch(_) => None,
            },
            _ => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

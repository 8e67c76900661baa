//! `CMake` configure and build phases
//!
//! Build process for one target:
//! ```bash
//! mkdir -p build/temp/<name>
//! cd build/temp/<name>
//! cmake <root_dir> -DCMAKE_LIBRARY_OUTPUT_DIRECTORY=... -DPYTHON_EXECUTABLE=...
//! cmake --build . -j4
//! ```
//!
//! Generator output is not captured: both children inherit stdio.

use super::configurer::BuildConfiguration;
use super::toolchain::ToolchainInfo;
use super::types::{BuildResult, BuildTarget, WorkingArea};
use crate::error::{Error, ProcessFailure, Result};
use crate::process::{CommandRunner, Invocation, ProcessStatus};
use std::ffi::OsString;
use std::time::Instant;

/// Parallel jobs passed to the build tool, regardless of host core count
pub const BUILD_JOBS: u32 = 4;

/// Runs the two generator phases for a target
#[derive(Debug, Clone)]
pub struct BuildExecutor {
    /// Generator program
    generator: OsString,
    /// Print progress lines
    verbose: bool,
}

impl BuildExecutor {
    pub fn new(toolchain: &ToolchainInfo, verbose: bool) -> Self {
        Self {
            generator: toolchain.generator().to_os_string(),
            verbose,
        }
    }

    /// `<generator> <root_dir> -D...` in the working area
    pub fn configure_command(
        &self,
        target: &BuildTarget,
        config: &BuildConfiguration,
        area: &WorkingArea,
    ) -> Invocation {
        Invocation::new(&self.generator)
            .arg(target.root_dir())
            .args(config.to_args())
            .current_dir(area.path())
    }

    /// `<generator> --build . -j4` in the working area
    pub fn build_command(&self, area: &WorkingArea) -> Invocation {
        Invocation::new(&self.generator)
            .args(["--build", "."])
            .arg(format!("-j{BUILD_JOBS}"))
            .current_dir(area.path())
    }

    /// Configure then build `target`. Stops at the first failing phase.
    pub fn execute(
        &self,
        target: &BuildTarget,
        config: &BuildConfiguration,
        area: &WorkingArea,
        runner: &dyn CommandRunner,
    ) -> Result<BuildResult> {
        let start_time = Instant::now();

        if self.verbose {
            println!("Building CMake extension for {}...", target.name());
        }

        area.ensure()?;

        // Step 1: configure
        let configure = self.configure_command(target, config, area);
        let configure_status =
            run_phase(runner, &configure).map_err(|cause| Error::ConfigureFailure {
                target: target.name().to_string(),
                command: configure.command_line(),
                cause,
            })?;

        // Step 2: build
        let build = self.build_command(area);
        let build_status = run_phase(runner, &build).map_err(|cause| Error::BuildFailure {
            target: target.name().to_string(),
            command: build.command_line(),
            cause,
        })?;

        let result = BuildResult {
            target: target.name().to_string(),
            configure: configure_status,
            build: build_status,
            duration: start_time.elapsed(),
        };

        if self.verbose {
            println!(
                "Built {} in {:.2}s",
                result.target,
                result.duration.as_secs_f64()
            );
        }

        Ok(result)
    }
}

fn run_phase(
    runner: &dyn CommandRunner,
    invocation: &Invocation,
) -> Result<ProcessStatus, ProcessFailure> {
    match runner.run(invocation) {
        Ok(status) if status.success() => Ok(status),
        Ok(status) => Err(ProcessFailure::Exit(status)),
        Err(source) => Err(ProcessFailure::Launch(source)),
    }
}

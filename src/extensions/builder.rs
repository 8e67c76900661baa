//! Extension build pipeline
//!
//! Composes the stages of a run in a fixed order:
//!
//! 1. [`ToolchainValidator`] once
//! 2. [`DependencySynchronizer`] once
//! 3. one [`TargetBuild`] per declared target, in declaration order
//!
//! Targets are checked for duplicate names and missing roots between 1 and 2.
//! The first failing stage aborts the run; later targets are not attempted.

use super::configurer::{BuildConfigurer, OutputLayout};
use super::executor::BuildExecutor;
use super::submodules::DependencySynchronizer;
use super::toolchain::{ToolchainInfo, ToolchainOverrides, ToolchainValidator};
use super::types::{BuildResult, BuildTarget, WorkingArea};
use crate::error::{Error, Result, StageKind};
use crate::process::{CommandRunner, Invocation, SystemRunner};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One step of a run with its own failure mode
pub trait Stage {
    fn kind(&self) -> StageKind;

    /// Progress line shown in verbose mode
    fn describe(&self) -> String;

    /// Commands the stage would run, each with the phase it belongs to
    fn invocations(&self) -> Vec<(StageKind, Invocation)>;

    /// Run the stage. Only target builds produce a [`BuildResult`].
    fn run(&self, runner: &dyn CommandRunner) -> Result<Option<BuildResult>>;
}

/// Configure and build of a single target
///
/// The configuration is derived when the stage runs, so it is never computed
/// before the earlier stages have succeeded.
#[derive(Debug)]
pub struct TargetBuild<'a> {
    target: &'a BuildTarget,
    toolchain: &'a ToolchainInfo,
    configurer: BuildConfigurer<'a>,
    executor: &'a BuildExecutor,
    area: WorkingArea,
}

impl<'a> TargetBuild<'a> {
    pub fn new(
        target: &'a BuildTarget,
        toolchain: &'a ToolchainInfo,
        configurer: BuildConfigurer<'a>,
        executor: &'a BuildExecutor,
        build_temp: &Path,
    ) -> Self {
        Self {
            target,
            toolchain,
            configurer,
            executor,
            area: WorkingArea::for_target(build_temp, target),
        }
    }
}

impl Stage for TargetBuild<'_> {
    fn kind(&self) -> StageKind {
        StageKind::Build
    }

    fn describe(&self) -> String {
        format!("Configuring {}", self.target.name())
    }

    fn invocations(&self) -> Vec<(StageKind, Invocation)> {
        let config = self.configurer.configure(self.target, self.toolchain);
        vec![
            (
                StageKind::Configure,
                self.executor
                    .configure_command(self.target, &config, &self.area),
            ),
            (StageKind::Build, self.executor.build_command(&self.area)),
        ]
    }

    fn run(&self, runner: &dyn CommandRunner) -> Result<Option<BuildResult>> {
        let config = self.configurer.configure(self.target, self.toolchain);
        self.executor
            .execute(self.target, &config, &self.area, runner)
            .map(Some)
    }
}

/// Results of a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub results: Vec<BuildResult>,
}

impl RunReport {
    /// (`built_count`, `total_duration`)
    #[must_use]
    pub fn summary(&self) -> (usize, Duration) {
        let built = self.results.iter().filter(|r| r.success()).count();
        let total_duration = self.results.iter().map(|r| r.duration).sum();
        (built, total_duration)
    }
}

/// A command a run would execute, for `extbuild plan`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedCommand {
    pub stage: String,
    pub command: String,
    pub cwd: Option<PathBuf>,
}

impl PlannedCommand {
    fn new(stage: StageKind, invocation: &Invocation) -> Self {
        Self {
            stage: stage.to_string(),
            command: invocation.command_line(),
            cwd: invocation.cwd().map(Path::to_path_buf),
        }
    }
}

/// Runs the whole pipeline for a set of targets
#[derive(Debug)]
pub struct PipelineDriver<R> {
    toolchain: ToolchainInfo,
    layout: Box<dyn OutputLayout>,
    project_root: PathBuf,
    build_temp: PathBuf,
    runner: R,
    verbose: bool,
}

impl<R: CommandRunner> PipelineDriver<R> {
    pub fn new(
        toolchain: ToolchainInfo,
        layout: Box<dyn OutputLayout>,
        project_root: impl Into<PathBuf>,
        build_temp: impl Into<PathBuf>,
        runner: R,
    ) -> Self {
        Self {
            toolchain,
            layout,
            project_root: project_root.into(),
            build_temp: build_temp.into(),
            runner,
            verbose: false,
        }
    }

    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Validate, synchronize, then configure and build each target in order.
    ///
    /// The generator probe runs before targets are checked, so a missing
    /// generator is always reported as [`Error::ToolchainMissing`].
    pub fn run(&self, targets: &[BuildTarget]) -> Result<RunReport> {
        let executor = BuildExecutor::new(&self.toolchain, self.verbose);
        let mut report = RunReport::default();

        let validator = ToolchainValidator::new(&self.toolchain, targets);
        self.run_stage(&validator, &mut report)?;

        check_targets(targets)?;

        for stage in self.stages(targets, &executor) {
            self.run_stage(stage.as_ref(), &mut report)?;
        }

        Ok(report)
    }

    /// Commands [`Self::run`] would execute, in order, without side effects.
    pub fn plan(&self, targets: &[BuildTarget]) -> Result<Vec<PlannedCommand>> {
        check_targets(targets)?;

        let executor = BuildExecutor::new(&self.toolchain, false);
        let validator = ToolchainValidator::new(&self.toolchain, targets);
        Ok(validator
            .invocations()
            .into_iter()
            .chain(
                self.stages(targets, &executor)
                    .iter()
                    .flat_map(|stage| stage.invocations()),
            )
            .map(|(kind, invocation)| PlannedCommand::new(kind, &invocation))
            .collect())
    }

    fn run_stage(&self, stage: &dyn Stage, report: &mut RunReport) -> Result<()> {
        crate::debug!("stage: {}", stage.describe());
        if self.verbose && stage.kind() != StageKind::Build {
            println!("{}...", stage.describe());
        }

        if let Some(result) = stage.run(&self.runner)? {
            report.results.push(result);
        }
        Ok(())
    }

    fn stages<'a>(
        &'a self,
        targets: &'a [BuildTarget],
        executor: &'a BuildExecutor,
    ) -> Vec<Box<dyn Stage + 'a>> {
        let configurer = BuildConfigurer::new(self.layout.as_ref());

        let mut stages: Vec<Box<dyn Stage + 'a>> = Vec::with_capacity(targets.len() + 1);
        stages.push(Box::new(DependencySynchronizer::new(&self.project_root)));
        for target in targets {
            stages.push(Box::new(TargetBuild::new(
                target,
                &self.toolchain,
                configurer,
                executor,
                &self.build_temp,
            )));
        }
        stages
    }
}

/// Reject duplicate names and missing source roots before the sync runs
fn check_targets(targets: &[BuildTarget]) -> Result<()> {
    let mut seen = HashSet::new();
    for target in targets {
        if !seen.insert(target.name()) {
            return Err(Error::DuplicateTarget {
                name: target.name().to_string(),
            });
        }
        target.verify()?;
    }
    Ok(())
}

/// Build extensions with the toolchain taken from the environment
///
/// Simplest API for a packaging front end: resolves the toolchain, then runs
/// the full pipeline with real child processes.
///
/// # Example
///
/// ```no_run
/// use extbuild::{BuildTarget, NestedLayout, build_extensions};
/// use std::path::Path;
///
/// let targets = vec![BuildTarget::new("oineus", "oineus")];
/// let layout = NestedLayout::new("build/lib", "oineus/bindings/python");
///
/// match build_extensions(&targets, Box::new(layout), Path::new("."), Path::new("build/temp"), true) {
///     Ok(report) => println!("built {} extension(s)", report.summary().0),
///     Err(e) => eprintln!("{e}"),
/// }
/// ```
pub fn build_extensions(
    targets: &[BuildTarget],
    layout: Box<dyn OutputLayout>,
    project_root: &Path,
    build_temp: &Path,
    verbose: bool,
) -> Result<RunReport> {
    let defaults = ToolchainOverrides::default();
    let toolchain = ToolchainInfo::resolve(&defaults, &defaults)?;
    PipelineDriver::new(toolchain, layout, project_root, build_temp, SystemRunner)
        .verbose(verbose)
        .run(targets)
}

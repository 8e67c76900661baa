//! Subcommand implementations

pub(crate) mod build;
pub(crate) mod completion;
pub(crate) mod env;
pub(crate) mod plan;

use anyhow::Result;
use clap::Args;
use extbuild::{
    BuildTarget, CommandRunner, Config, Manifest, PipelineDriver, ToolchainInfo,
    ToolchainOverrides,
};
use std::path::PathBuf;

/// Flags shared by every command that reads the project
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct InputArgs {
    /// Path to extbuild.toml (default: nearest one in this or a parent directory)
    #[arg(long)]
    pub(crate) manifest: Option<PathBuf>,

    /// Scratch directory for per-extension build trees
    #[arg(long)]
    pub(crate) build_temp: Option<PathBuf>,

    /// Directory compiled extensions are placed under
    #[arg(long)]
    pub(crate) build_lib: Option<PathBuf>,

    /// Build generator program (default: `CMAKE` env var, then `cmake`)
    #[arg(long)]
    pub(crate) generator: Option<String>,

    /// Interpreter to build against (default: `PYTHON` env var, then python3 on PATH)
    #[arg(long)]
    pub(crate) interpreter: Option<PathBuf>,

    /// Use an alternate tool config file
    #[arg(long = "config-file")]
    pub(crate) config_file: Option<PathBuf>,

    /// Do not load any tool config file
    #[arg(long)]
    pub(crate) norc: bool,
}

impl InputArgs {
    pub(crate) fn overrides(&self) -> ToolchainOverrides {
        ToolchainOverrides {
            generator: self.generator.clone(),
            interpreter: self.interpreter.clone(),
        }
    }
}

/// Everything a build or plan needs, resolved once
#[derive(Debug)]
pub(crate) struct Project {
    pub(crate) manifest: Manifest,
    pub(crate) targets: Vec<BuildTarget>,
    pub(crate) toolchain: ToolchainInfo,
    pub(crate) build_temp: PathBuf,
    pub(crate) build_lib: PathBuf,
}

impl Project {
    pub(crate) fn load(inputs: &InputArgs) -> Result<Self> {
        let manifest = Manifest::discover(inputs.manifest.as_deref())?;
        let config = Config::load_with_options(
            manifest.project_root(),
            inputs.config_file.as_deref(),
            inputs.norc,
        )?;

        let toolchain = ToolchainInfo::resolve(&inputs.overrides(), &config.overrides())?;

        let build_temp = match &inputs.build_temp {
            Some(dir) => std::path::absolute(dir)?,
            None => manifest.build_temp()?,
        };
        let build_lib = match &inputs.build_lib {
            Some(dir) => std::path::absolute(dir)?,
            None => manifest.build_lib()?,
        };
        let targets = manifest.targets()?;

        Ok(Self {
            manifest,
            targets,
            toolchain,
            build_temp,
            build_lib,
        })
    }

    pub(crate) fn driver<R: CommandRunner>(&self, runner: R) -> PipelineDriver<R> {
        PipelineDriver::new(
            self.toolchain.clone(),
            self.manifest.layout(self.build_lib.clone()),
            self.manifest.project_root(),
            self.build_temp.clone(),
            runner,
        )
    }
}

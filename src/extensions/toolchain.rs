//! Toolchain resolution and validation
//!
//! The generator, interpreter and compiler override are looked up exactly
//! once per run and frozen into a [`ToolchainInfo`]. Every later stage reads
//! from that value instead of from the environment.
//!
//! Generator lookup order:
//! 1. `--generator` flag
//! 2. `CMAKE` environment variable
//! 3. `generator` in the tool config
//! 4. `cmake` (resolved on `PATH` when launched)
//!
//! Interpreter lookup order:
//! 1. `--interpreter` flag
//! 2. `PYTHON` environment variable
//! 3. `interpreter` in the tool config
//! 4. `python3`, then `python`, on `PATH`

use super::builder::Stage;
use super::types::{BuildResult, BuildTarget};
use crate::env_vars;
use crate::error::{Error, Result, StageKind};
use crate::process::{CommandRunner, Invocation};
use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Generator launched when nothing overrides it
pub const DEFAULT_GENERATOR: &str = "cmake";

/// Interpreter names searched on `PATH`, in order
pub const INTERPRETER_CANDIDATES: [&str; 2] = ["python3", "python"];

/// Explicit toolchain choices from flags or config files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolchainOverrides {
    pub generator: Option<String>,
    pub interpreter: Option<PathBuf>,
}

/// Resolved build environment, immutable for the rest of the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainInfo {
    generator: OsString,
    interpreter: PathBuf,
    compiler: Option<String>,
}

impl ToolchainInfo {
    pub fn new(
        generator: impl Into<OsString>,
        interpreter: impl Into<PathBuf>,
        compiler: Option<String>,
    ) -> Self {
        Self {
            generator: generator.into(),
            interpreter: interpreter.into(),
            compiler: compiler.filter(|value| !value.is_empty()),
        }
    }

    /// Resolve from the process environment.
    pub fn resolve(flags: &ToolchainOverrides, config: &ToolchainOverrides) -> Result<Self> {
        Self::resolve_with(flags, config, env_vars::var, find_executable)
    }

    /// Resolve with injected environment lookup and `PATH` search.
    pub fn resolve_with<L, S>(
        flags: &ToolchainOverrides,
        config: &ToolchainOverrides,
        lookup: L,
        search: S,
    ) -> Result<Self>
    where
        L: Fn(&str) -> Option<String>,
        S: Fn(&[&str]) -> Option<PathBuf>,
    {
        let generator = flags
            .generator
            .clone()
            .or_else(|| lookup(env_vars::CMAKE))
            .or_else(|| config.generator.clone())
            .unwrap_or_else(|| DEFAULT_GENERATOR.to_string());

        let explicit = flags
            .interpreter
            .clone()
            .or_else(|| lookup(env_vars::PYTHON).map(PathBuf::from))
            .or_else(|| config.interpreter.clone());

        let interpreter = match explicit {
            Some(path) => locate_interpreter(&path, &search)?,
            None => search(INTERPRETER_CANDIDATES.as_slice()).ok_or_else(|| {
                Error::InterpreterNotFound {
                    searched: INTERPRETER_CANDIDATES.join(", "),
                }
            })?,
        };

        let compiler = lookup(env_vars::CXX);

        crate::debug!(
            "toolchain: generator={generator} interpreter={} compiler={}",
            interpreter.display(),
            compiler.as_deref().unwrap_or("<default>")
        );

        Ok(Self::new(generator, interpreter, compiler))
    }

    /// Build generator program
    pub fn generator(&self) -> &OsStr {
        &self.generator
    }

    /// Absolute path of the interpreter the extension targets
    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }

    /// Compiler override, absent when none was provided
    pub fn compiler(&self) -> Option<&str> {
        self.compiler.as_deref()
    }
}

/// First of `names` found on `PATH` as an executable, made absolute
pub fn find_executable(names: &[&str]) -> Option<PathBuf> {
    let cwd = env::current_dir().ok()?;
    find_executable_in(names, env::var_os("PATH")?, &cwd)
}

/// [`find_executable`] over an explicit search path. Relative entries in
/// `search_path` resolve against `cwd`.
pub fn find_executable_in(
    names: &[&str],
    search_path: impl AsRef<OsStr>,
    cwd: &Path,
) -> Option<PathBuf> {
    let dirs = env::split_paths(search_path.as_ref()).map(|dir| cwd.join(dir));
    let search_path = env::join_paths(dirs).ok()?;

    names.iter().find_map(|name| {
        let found = which::which_in(*name, Some(&search_path), cwd).ok()?;
        std::path::absolute(found).ok()
    })
}

/// Bare names are looked up on `PATH`; anything with a separator is a path.
fn locate_interpreter<S>(path: &Path, search: &S) -> Result<PathBuf>
where
    S: Fn(&[&str]) -> Option<PathBuf>,
{
    if path.components().count() == 1
        && !path.is_absolute()
        && let Some(name) = path.to_str()
    {
        return search([name].as_slice()).ok_or_else(|| Error::InterpreterNotFound {
            searched: name.to_string(),
        });
    }

    std::path::absolute(path).map_err(|_| Error::InterpreterNotFound {
        searched: path.display().to_string(),
    })
}

/// Confirms the build generator can be launched at all
///
/// Only the launch matters: the version output and exit code are ignored.
#[derive(Debug, Clone)]
pub struct ToolchainValidator {
    generator: OsString,
    targets: Vec<String>,
}

impl ToolchainValidator {
    pub fn new(toolchain: &ToolchainInfo, targets: &[BuildTarget]) -> Self {
        Self {
            generator: toolchain.generator().to_os_string(),
            targets: targets.iter().map(|t| t.name().to_string()).collect(),
        }
    }

    /// `<generator> --version`
    pub fn probe(&self) -> Invocation {
        Invocation::new(&self.generator).arg("--version").quiet()
    }

    pub fn validate(&self, runner: &dyn CommandRunner) -> Result<()> {
        match runner.run(&self.probe()) {
            Ok(status) => {
                crate::debug!("generator probe finished with {status}");
                Ok(())
            }
            Err(source) => Err(Error::ToolchainMissing {
                program: self.generator.to_string_lossy().into_owned(),
                targets: self.targets.join(", "),
                source,
            }),
        }
    }
}

impl Stage for ToolchainValidator {
    fn kind(&self) -> StageKind {
        StageKind::Validate
    }

    fn describe(&self) -> String {
        format!("Checking for {}", self.generator.to_string_lossy())
    }

    fn invocations(&self) -> Vec<(StageKind, Invocation)> {
        vec![(self.kind(), self.probe())]
    }

    fn run(&self, runner: &dyn CommandRunner) -> Result<Option<BuildResult>> {
        self.validate(runner).map(|()| None)
    }
}

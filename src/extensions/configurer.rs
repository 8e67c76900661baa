//! Generator variable derivation
//!
//! Turns a [`BuildTarget`] and the resolved [`ToolchainInfo`] into the
//! ordered set of `-D` variables handed to CMake:
//!
//! ```text
//! -DCMAKE_LIBRARY_OUTPUT_DIRECTORY=<output dir>
//! -DPYTHON_EXECUTABLE=<interpreter>
//! -DCMAKE_CXX_COMPILER=<override>      (only when an override exists)
//! -D<extra>=<value>                    (project-declared, in order)
//! ```
//!
//! Where the compiled library lands depends on the package layout, so the
//! output directory comes from an [`OutputLayout`] strategy supplied by the
//! caller.

use super::toolchain::ToolchainInfo;
use super::types::BuildTarget;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

/// Directory CMake writes the compiled module library into
pub const OUTPUT_DIR_VAR: &str = "CMAKE_LIBRARY_OUTPUT_DIRECTORY";

/// Interpreter the bindings are compiled against
pub const PYTHON_EXEC_VAR: &str = "PYTHON_EXECUTABLE";

/// C++ compiler override
pub const CXX_COMPILER_VAR: &str = "CMAKE_CXX_COMPILER";

/// Variables owned by the configurer; project defines may not set them
pub const RESERVED_VARS: [&str; 3] = [OUTPUT_DIR_VAR, PYTHON_EXEC_VAR, CXX_COMPILER_VAR];

/// Strategy deciding where a target's compiled library goes
pub trait OutputLayout: fmt::Debug {
    fn output_dir(&self, target: &BuildTarget) -> PathBuf;
}

/// Directory a module named `name` lives in below `build_lib`.
///
/// `oineus` lands directly in `build_lib`; `pkg.sub.native` in
/// `build_lib/pkg/sub`.
pub fn module_dir(build_lib: &Path, name: &str) -> PathBuf {
    let mut parts: Vec<&str> = name.split('.').collect();
    parts.pop();
    parts
        .into_iter()
        .fold(build_lib.to_path_buf(), |dir, part| dir.join(part))
}

/// Library goes straight into the module's own output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatLayout {
    build_lib: PathBuf,
}

impl FlatLayout {
    pub fn new(build_lib: impl Into<PathBuf>) -> Self {
        Self {
            build_lib: build_lib.into(),
        }
    }
}

impl OutputLayout for FlatLayout {
    fn output_dir(&self, target: &BuildTarget) -> PathBuf {
        module_dir(&self.build_lib, target.name())
    }
}

/// Library goes into a fixed subpath of the package, e.g.
/// `oineus/bindings/python`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedLayout {
    build_lib: PathBuf,
    subpath: PathBuf,
}

impl NestedLayout {
    pub fn new(build_lib: impl Into<PathBuf>, subpath: impl Into<PathBuf>) -> Self {
        Self {
            build_lib: build_lib.into(),
            subpath: subpath.into(),
        }
    }
}

impl OutputLayout for NestedLayout {
    fn output_dir(&self, target: &BuildTarget) -> PathBuf {
        module_dir(&self.build_lib, target.name()).join(&self.subpath)
    }
}

/// Ordered generator variables for one target
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildConfiguration {
    defines: Vec<(String, OsString)>,
}

impl BuildConfiguration {
    pub fn new(defines: Vec<(String, OsString)>) -> Self {
        Self { defines }
    }

    pub fn get(&self, name: &str) -> Option<&OsStr> {
        self.defines
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_os_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OsStr)> {
        self.defines
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_os_str()))
    }

    pub fn len(&self) -> usize {
        self.defines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defines.is_empty()
    }

    /// Render as `-DNAME=VALUE` arguments
    pub fn to_args(&self) -> Vec<OsString> {
        self.iter()
            .map(|(key, value)| {
                let mut arg = OsString::from(format!("-D{key}="));
                arg.push(value);
                arg
            })
            .collect()
    }
}

/// Derives a [`BuildConfiguration`] per target. Pure: no filesystem or
/// process access.
#[derive(Debug, Clone, Copy)]
pub struct BuildConfigurer<'a> {
    layout: &'a dyn OutputLayout,
}

impl<'a> BuildConfigurer<'a> {
    pub fn new(layout: &'a dyn OutputLayout) -> Self {
        Self { layout }
    }

    pub fn configure(&self, target: &BuildTarget, toolchain: &ToolchainInfo) -> BuildConfiguration {
        let output_dir = self.layout.output_dir(target);

        let mut defines = vec![
            (OUTPUT_DIR_VAR.to_string(), output_dir.into_os_string()),
            (
                PYTHON_EXEC_VAR.to_string(),
                toolchain.interpreter().as_os_str().to_os_string(),
            ),
        ];

        if let Some(compiler) = toolchain.compiler() {
            defines.push((CXX_COMPILER_VAR.to_string(), OsString::from(compiler)));
        }

        for (key, value) in target.defines() {
            // reserved names are rejected at manifest load
            if RESERVED_VARS.contains(&key.as_str()) {
                crate::debug!("ignoring define {key} for {}: reserved", target.name());
                continue;
            }
            defines.push((key.clone(), OsString::from(value)));
        }

        BuildConfiguration::new(defines)
    }
}

//! Native extension building
//!
//! Compiles `CMake`-based extension modules while a Python package is being
//! built. The native library itself comes in as git submodules and is only
//! ever reached through `cmake`.
//!
//! Pipeline stages:
//! - Toolchain check (`cmake --version`)
//! - Submodule sync (`git submodule update --init --recursive`)
//! - Per extension: variable derivation, then `cmake <root> -D...` and
//!   `cmake --build . -j4`

pub mod builder;
pub mod configurer;
pub mod executor;
pub mod submodules;
pub mod toolchain;
pub mod types;

pub use builder::{PipelineDriver, PlannedCommand, RunReport, Stage, TargetBuild, build_extensions};
pub use configurer::{
    BuildConfiguration, BuildConfigurer, CXX_COMPILER_VAR, FlatLayout, NestedLayout,
    OUTPUT_DIR_VAR, OutputLayout, PYTHON_EXEC_VAR,
};
pub use executor::{BUILD_JOBS, BuildExecutor};
pub use submodules::DependencySynchronizer;
pub use toolchain::{ToolchainInfo, ToolchainOverrides, ToolchainValidator};
pub use types::{BuildResult, BuildTarget, WorkingArea};

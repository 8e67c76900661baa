//! extbuild internal library code

pub mod config;
pub mod debug;
pub mod env_vars;
pub mod error;
pub mod extensions;
pub mod manifest;
pub mod paths;
pub mod process;
pub mod test_utils;

// Re-export common types for convenience
pub use config::Config;
pub use debug::{debug_log, debug_logf, init_debug, is_debug_enabled};
pub use error::{Error, ProcessFailure, Result, StageKind};
pub use extensions::{
    BuildConfiguration, BuildConfigurer, BuildExecutor, BuildResult, BuildTarget,
    DependencySynchronizer, FlatLayout, NestedLayout, OutputLayout, PipelineDriver,
    PlannedCommand, RunReport, Stage, ToolchainInfo, ToolchainOverrides, ToolchainValidator,
    WorkingArea, build_extensions,
};
pub use manifest::{Manifest, OutputSection};
pub use paths::{MANIFEST_FILE, find_manifest, find_manifest_in};
pub use process::{CommandRunner, Invocation, ProcessStatus, SystemRunner};

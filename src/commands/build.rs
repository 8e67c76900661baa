//! Build command
//!
//! Runs the full extension pipeline: toolchain check, submodule sync, then
//! configure and build for each declared extension.

use super::{InputArgs, Project};
use anyhow::Result;
use extbuild::SystemRunner;

/// Build every extension declared in the manifest
pub(crate) fn run(inputs: &InputArgs, verbose: bool) -> Result<()> {
    let project = Project::load(inputs)?;

    let report = project
        .driver(SystemRunner)
        .verbose(verbose)
        .run(&project.targets)?;

    let (built, duration) = report.summary();
    println!(
        "Built {built} extension(s) in {:.2}s",
        duration.as_secs_f64()
    );

    Ok(())
}

//! Plan command
//!
//! Prints the exact command lines `extbuild build` would run, in order,
//! without launching anything or touching the filesystem.

use super::{InputArgs, Project};
use anyhow::{Context, Result};
use extbuild::{PlannedCommand, SystemRunner};

/// Print the build plan as text or JSON
pub(crate) fn run(inputs: &InputArgs, json: bool) -> Result<()> {
    let project = Project::load(inputs)?;
    let plan = project.driver(SystemRunner).plan(&project.targets)?;

    if json {
        let rendered =
            serde_json::to_string_pretty(&plan).context("Failed to serialize build plan")?;
        println!("{rendered}");
    } else {
        for step in &plan {
            println!("{}", format_step(step));
        }
    }

    Ok(())
}

fn format_step(step: &PlannedCommand) -> String {
    match &step.cwd {
        Some(dir) => format!("[{}] (in {}) {}", step.stage, dir.display(), step.command),
        None => format!("[{}] {}", step.stage, step.command),
    }
}

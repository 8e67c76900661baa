//! Env Command
//!
//! Displays environment information useful for debugging extension builds:
//! the resolved generator, interpreter and compiler, the platform, and the
//! environment variables extbuild reads.

use super::InputArgs;
use anyhow::Result;
use extbuild::{Config, Manifest, ToolchainInfo, env_vars};
use std::env;
use std::ffi::OsStr;
use std::process::Command;

/// Display environment information
pub(crate) fn run(inputs: &InputArgs) -> Result<()> {
    println!("## Environment");
    println!();

    println!("extbuild   {}", env!("CARGO_PKG_VERSION"));
    println!();

    // A missing manifest is fine here; config is then looked up from the cwd
    let project_root = match Manifest::discover(inputs.manifest.as_deref()) {
        Ok(manifest) => manifest.project_root().to_path_buf(),
        Err(err) => {
            extbuild::debug!("no manifest: {err}");
            env::current_dir()?
        }
    };
    let config = Config::load_with_options(
        &project_root,
        inputs.config_file.as_deref(),
        inputs.norc,
    )?;

    println!("Project    {}", project_root.display());
    println!();

    match ToolchainInfo::resolve(&inputs.overrides(), &config.overrides()) {
        Ok(toolchain) => {
            print_generator(toolchain.generator());
            println!("Python     {}", toolchain.interpreter().display());
            println!(
                "Compiler   {}",
                toolchain.compiler().unwrap_or("(generator default)")
            );
        }
        Err(err) => {
            println!("Toolchain  {err}");
        }
    }
    println!();

    // Platform
    println!("## Platform");
    println!();
    println!("OS         {}", env::consts::OS);
    println!("Arch       {}", env::consts::ARCH);
    println!("Family     {}", env::consts::FAMILY);
    println!();

    println!("## Environment Variables");
    println!();

    for var in &env_vars::REPORTED {
        if let Ok(value) = env::var(var) {
            println!("{var:<20} {value}");
        }
    }

    Ok(())
}

fn print_generator(generator: &OsStr) {
    let name = generator.to_string_lossy();
    let Ok(output) = Command::new(generator).arg("--version").output() else {
        println!("Generator  {name} not found");
        return;
    };

    // Only the first line of `cmake --version` carries the version
    let version = String::from_utf8_lossy(&output.stdout);
    match version.lines().next() {
        Some(first) if output.status.success() => {
            println!("Generator  {name} ({})", first.trim());
        }
        _ => println!("Generator  {name} (version unknown)"),
    }
}

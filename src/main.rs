//! extbuild command-line interface
//!
//! Builds the CMake extensions declared in `extbuild.toml`

use clap::{Parser, Subcommand};
use std::process;

/// Top line of an error report, naming the failed stage when known
fn error_headline(err: &anyhow::Error) -> String {
    match err.downcast_ref::<extbuild::Error>() {
        Some(build_err) => format!("error: {} failed: {err}", build_err.stage()),
        None => format!("error: {err}"),
    }
}

/// Display an error with optional backtrace information
fn display_error(err: &anyhow::Error, backtrace_enabled: bool) {
    eprintln!("{}", error_headline(err));

    // Show error chain
    let mut source = err.source();
    while let Some(err) = source {
        eprintln!("caused by: {err}");
        source = err.source();
    }

    if backtrace_enabled {
        let backtrace = err.backtrace();
        if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
            eprintln!("\nBacktrace:");
            eprintln!("{backtrace}");
        }
    }
}

#[derive(Parser)]
#[command(name = "extbuild")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build CMake-based native extensions", long_about = None)]
pub(crate) struct Cli {
    /// Print debug information to stderr
    #[arg(long, global = true)]
    debug: bool,

    /// Show a backtrace on error (requires `RUST_BACKTRACE=1`)
    #[arg(long, global = true)]
    backtrace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the toolchain, sync submodules, then configure and build every extension
    Build {
        #[command(flatten)]
        inputs: commands::InputArgs,

        /// Print progress for each stage
        #[arg(long)]
        verbose: bool,
    },

    /// Print the commands `build` would run without running them
    Plan {
        #[command(flatten)]
        inputs: commands::InputArgs,

        /// Emit the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the resolved toolchain and relevant environment
    Env {
        #[command(flatten)]
        inputs: commands::InputArgs,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    extbuild::init_debug(cli.debug);

    let result = match cli.command {
        Commands::Build { inputs, verbose } => commands::build::run(&inputs, verbose),
        Commands::Plan { inputs, json } => commands::plan::run(&inputs, json),
        Commands::Env { inputs } => commands::env::run(&inputs),
        Commands::Completion { shell } => commands::completion::run(shell),
    };

    if let Err(e) = result {
        display_error(&e, cli.backtrace);
        process::exit(1);
    }
}

mod commands;

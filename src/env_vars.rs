//! Environment variables consulted while resolving the toolchain.
//!
//! Everything here is read once, when [`crate::ToolchainInfo`] is resolved.
//! Nothing downstream of that touches the process environment again.

use std::env;

/// Compiler override handed to the generator as `CMAKE_CXX_COMPILER`.
pub const CXX: &str = "CXX";

/// Build generator program (defaults to `cmake` on `PATH`).
pub const CMAKE: &str = "CMAKE";

/// Interpreter the extension is being built for.
pub const PYTHON: &str = "PYTHON";

/// Variables shown by `extbuild env`.
pub const REPORTED: [&str; 4] = [CXX, CMAKE, PYTHON, "PATH"];

/// Read a variable, treating an empty value the same as an unset one.
pub fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

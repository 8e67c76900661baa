//! Path utilities for manifest discovery and relative path resolution.

use std::path::{Path, PathBuf};

/// File name of the project manifest.
pub const MANIFEST_FILE: &str = "extbuild.toml";

/// Find the manifest starting at the current directory.
#[must_use]
pub fn find_manifest() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_manifest_in(cwd)
}

/// Find the manifest in `dir` or the closest ancestor that has one.
#[must_use]
pub fn find_manifest_in(dir: impl AsRef<Path>) -> Option<PathBuf> {
    dir.as_ref()
        .ancestors()
        .map(|ancestor| ancestor.join(MANIFEST_FILE))
        .find(|candidate| candidate.is_file())
}

/// Resolve `path` against `base` unless it is already absolute, then make
/// the result absolute without touching the filesystem.
pub fn resolve_against(base: &Path, path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    std::path::absolute(base.join(path))
}

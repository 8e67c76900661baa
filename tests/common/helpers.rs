//! Shared test helpers and utilities

use extbuild::{CommandRunner, Invocation, ProcessStatus};
use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::PathBuf;
use tempfile::TempDir;

/// Get the path to the extbuild binary (target/debug/extbuild)
///
/// This is shared across all integration tests to avoid duplication.
#[allow(dead_code)]
pub(crate) fn get_extbuild_binary() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    std::path::Path::new(manifest_dir)
        .join("target/debug/extbuild")
        .to_string_lossy()
        .to_string()
}

/// Create a project with a `CMakeLists.txt` root per extension name
///
/// # Returns
/// The temp dir (keep it alive) and the extension roots, in order
#[allow(dead_code)]
pub(crate) fn create_test_project(names: &[&str]) -> (TempDir, Vec<PathBuf>) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let roots = names
        .iter()
        .map(|name| {
            let root = temp_dir.path().join(name);
            fs::create_dir_all(&root).expect("Failed to create extension root");
            fs::write(
                root.join("CMakeLists.txt"),
                format!("cmake_minimum_required(VERSION 3.15)\nproject({name})\n"),
            )
            .expect("Failed to write CMakeLists.txt");
            root
        })
        .collect();
    (temp_dir, roots)
}

/// Write `extbuild.toml` declaring `names` with the given `[output]` table body
///
/// # Returns
/// The path to the created manifest
#[allow(dead_code)]
pub(crate) fn create_test_manifest(temp_dir: &TempDir, names: &[&str], output: &str) -> PathBuf {
    let manifest_path = temp_dir.path().join("extbuild.toml");

    let mut content = format!("[output]\n{output}\n");
    for name in names {
        content.push_str(&format!("\n[[extension]]\nname = \"{name}\"\nroot_dir = \"{name}\"\n"));
    }

    fs::write(&manifest_path, content).expect("Failed to write extbuild.toml");
    manifest_path
}

/// Create an empty file that stands in for an interpreter binary
#[allow(dead_code)]
pub(crate) fn create_fake_interpreter(temp_dir: &TempDir) -> PathBuf {
    let path = temp_dir.path().join("python3");
    fs::write(&path, "").expect("Failed to write fake interpreter");
    path
}

#[derive(Debug, Clone, Copy)]
enum Outcome {
    Exit(ProcessStatus),
    Unlaunchable,
}

/// Records invocations and answers with scripted outcomes.
///
/// Rules match on a command-line prefix; the first matching rule wins and
/// anything unmatched exits 0.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub(crate) struct RecordingRunner {
    rules: Vec<(String, Outcome)>,
    calls: RefCell<Vec<Invocation>>,
}

#[allow(dead_code)]
impl RecordingRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Commands starting with `prefix` exit with `status`
    pub(crate) fn exit_with(mut self, prefix: &str, status: ProcessStatus) -> Self {
        self.rules.push((prefix.to_string(), Outcome::Exit(status)));
        self
    }

    /// Commands starting with `prefix` fail to launch
    pub(crate) fn unlaunchable(mut self, prefix: &str) -> Self {
        self.rules.push((prefix.to_string(), Outcome::Unlaunchable));
        self
    }

    pub(crate) fn invocations(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    pub(crate) fn command_lines(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(Invocation::command_line)
            .collect()
    }

    /// Number of recorded invocations whose command line starts with `prefix`
    pub(crate) fn count(&self, prefix: &str) -> usize {
        self.command_lines()
            .iter()
            .filter(|line| line.starts_with(prefix))
            .count()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<ProcessStatus> {
        self.calls.borrow_mut().push(invocation.clone());
        let line = invocation.command_line();

        let outcome = self
            .rules
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map_or(Outcome::Exit(ProcessStatus::from_code(0)), |(_, o)| *o);

        match outcome {
            Outcome::Exit(status) => Ok(status),
            Outcome::Unlaunchable => Err(io::Error::new(
                io::ErrorKind::NotFound,
                "No such file or directory (os error 2)",
            )),
        }
    }
}

mod common;

use common::get_extbuild_binary;
use common::helpers::{create_fake_interpreter, create_test_manifest, create_test_project};
use std::process::{Command, Output};
use tempfile::TempDir;

// ============================================================================
// Helpers
// ============================================================================

fn extbuild(temp: &TempDir, args: &[&str]) -> Output {
    let interpreter = create_fake_interpreter(temp);
    Command::new(get_extbuild_binary())
        .args(args)
        .arg("--interpreter")
        .arg(&interpreter)
        .arg("--norc")
        .current_dir(temp.path())
        .env_remove("CXX")
        .env_remove("CMAKE")
        .env_remove("PYTHON")
        .output()
        .expect("Failed to execute extbuild")
}

// ============================================================================
// Top-level
// ============================================================================

#[test]
fn help_lists_subcommands() {
    let output = Command::new(get_extbuild_binary())
        .arg("--help")
        .output()
        .expect("Failed to execute extbuild --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["build", "plan", "env", "completion"] {
        assert!(stdout.contains(command), "help should mention {command}");
    }
}

#[test]
fn version_flag_prints_version() {
    let output = Command::new(get_extbuild_binary())
        .arg("--version")
        .output()
        .expect("Failed to execute extbuild --version");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

// ============================================================================
// plan
// ============================================================================

#[test]
fn plan_prints_commands_in_order() {
    let (temp, _roots) = create_test_project(&["oineus"]);
    create_test_manifest(&temp, &["oineus"], "layout = \"flat\"");

    let output = extbuild(&temp, &["plan", "--generator", "cmake"]);

    assert!(
        output.status.success(),
        "plan failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines.first(), Some(&"[toolchain check] cmake --version"));
    assert!(
        lines
            .get(1)
            .is_some_and(|l| l.ends_with("git submodule update --init --recursive"))
    );
    assert!(lines.get(3).is_some_and(|l| l.ends_with("cmake --build . -j4")));
    assert!(!temp.path().join("build").exists());
}

#[test]
fn plan_json_is_machine_readable() {
    let (temp, _roots) = create_test_project(&["oineus"]);
    create_test_manifest(
        &temp,
        &["oineus"],
        "layout = \"nested\"\nsubpath = \"oineus/bindings/python\"",
    );

    let output = extbuild(&temp, &["plan", "--json", "--generator", "cmake"]);

    assert!(output.status.success());
    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let steps = plan.as_array().unwrap();
    assert_eq!(steps.len(), 4);

    let configure = steps.get(2).unwrap();
    assert_eq!(
        configure.get("stage").and_then(|v| v.as_str()),
        Some("configure")
    );
    assert!(
        configure
            .get("command")
            .and_then(|v| v.as_str())
            .is_some_and(|c| c.contains("oineus/bindings/python"))
    );
}

#[test]
fn plan_without_manifest_fails() {
    let temp = TempDir::new().unwrap();

    let output = extbuild(&temp, &["plan"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:"));
}

#[test]
fn plan_rejects_reserved_define() {
    let (temp, _roots) = create_test_project(&["oineus"]);
    std::fs::write(
        temp.path().join("extbuild.toml"),
        "[[extension]]\nname = \"oineus\"\nroot_dir = \"oineus\"\ndefines = { PYTHON_EXECUTABLE = \"/bin/sh\" }\n",
    )
    .unwrap();

    let output = extbuild(&temp, &["plan"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("PYTHON_EXECUTABLE"));
}

// ============================================================================
// build
// ============================================================================

#[test]
fn build_reports_missing_generator() {
    let (temp, _roots) = create_test_project(&["oineus"]);
    create_test_manifest(&temp, &["oineus"], "layout = \"flat\"");

    let output = extbuild(
        &temp,
        &["build", "--generator", "extbuild-no-such-generator"],
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("error: toolchain check failed: "));
    assert!(stderr.contains("extbuild-no-such-generator"));
    assert!(stderr.contains("oineus"));
    assert!(!temp.path().join("build").exists());
}

#[test]
fn missing_interpreter_is_reported_before_any_run() {
    let (temp, _roots) = create_test_project(&["oineus"]);
    create_test_manifest(&temp, &["oineus"], "layout = \"flat\"");
    let empty_path = temp.path().join("empty-bin");
    std::fs::create_dir_all(&empty_path).unwrap();

    let output = Command::new(get_extbuild_binary())
        .args(["build", "--norc", "--generator", "extbuild-no-such-generator"])
        .current_dir(temp.path())
        .env("PATH", &empty_path)
        .env_remove("PYTHON")
        .env_remove("CMAKE")
        .output()
        .expect("Failed to execute extbuild build");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("error: setup failed: no interpreter found"));
    assert!(!temp.path().join("build").exists());
}

// ============================================================================
// env / completion
// ============================================================================

#[test]
fn env_displays_toolchain_and_platform() {
    let temp = TempDir::new().unwrap();

    let output = extbuild(&temp, &["env"]);

    assert!(output.status.success(), "extbuild env should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("## Environment"));
    assert!(stdout.contains("## Platform"));
    assert!(stdout.contains("Python"));
}

#[test]
fn completion_generates_bash_script() {
    let output = Command::new(get_extbuild_binary())
        .args(["completion", "bash"])
        .output()
        .expect("Failed to execute extbuild completion");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("extbuild"));
}

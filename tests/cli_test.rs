// SPDX-License-Identifier: Apache-2.0

//! CLI integration tests — run the venv-pick binary as a subprocess against
//! temporary directory trees.
//!
//! Every search test pins `VENV_PICK_CEILING` to its temp dir so the ascent
//! never wanders into the developer's real parent directories.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

/// Helper: run venv-pick from `cwd` with the search bounded at `ceiling`.
fn pick_cmd(cwd: &Path, ceiling: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_venv-pick"))
        .args(args)
        .current_dir(cwd)
        .env("VENV_PICK_CEILING", ceiling)
        .env_remove("VENV_PICK_LOG")
        .output()
        .expect("failed to execute venv-pick binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn make_venv(path: &Path) {
    fs::create_dir_all(path.join("bin")).unwrap();
    fs::write(path.join("bin").join("activate"), "# activate\n").unwrap();
}

// ── Version & Help ──────────────────────────────────────────────

#[test]
fn test_cli_version() {
    let tmp = tempfile::tempdir().unwrap();
    let out = pick_cmd(tmp.path(), tmp.path(), &["--version"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("venv-pick 0."), "unexpected: {}", stdout(&out));
}

#[test]
fn test_cli_help() {
    let tmp = tempfile::tempdir().unwrap();
    let out = pick_cmd(tmp.path(), tmp.path(), &["--help"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("--ceiling"), "unexpected: {}", stdout(&out));
}

// ── Direct path ─────────────────────────────────────────────────

#[test]
fn test_direct_path_valid() {
    let tmp = tempfile::tempdir().unwrap();
    let venv = tmp.path().join("valid_venv");
    make_venv(&venv);
    let arg = venv.to_string_lossy().to_string();

    let out = pick_cmd(tmp.path(), tmp.path(), &[&arg]);
    assert!(out.status.success(), "failed: {}", stderr(&out));
    assert_eq!(stdout(&out), format!("source {}/bin/activate", arg));
    assert!(stderr(&out).contains(&format!("Activating environment {}...", arg)));
}

#[test]
fn test_direct_path_relative_kept_as_typed() {
    let tmp = tempfile::tempdir().unwrap();
    make_venv(&tmp.path().join("env"));

    let out = pick_cmd(tmp.path(), tmp.path(), &["env"]);
    assert!(out.status.success(), "failed: {}", stderr(&out));
    assert_eq!(stdout(&out), "source env/bin/activate");
}

#[test]
fn test_direct_path_invalid() {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir(tmp.path().join("not_a_venv")).unwrap();

    let out = pick_cmd(tmp.path(), tmp.path(), &["not_a_venv"]);
    assert!(!out.status.success());
    assert!(stdout(&out).is_empty());
    assert!(
        stderr(&out).contains("Directory 'not_a_venv' is not a valid virtual environment."),
        "unexpected: {}",
        stderr(&out)
    );
}

#[test]
fn test_direct_path_missing() {
    let tmp = tempfile::tempdir().unwrap();
    let out = pick_cmd(tmp.path(), tmp.path(), &["path/that/does/not/exist"]);
    assert!(!out.status.success());
    assert!(stdout(&out).is_empty());
}

// ── Search ──────────────────────────────────────────────────────

#[test]
fn test_search_single_in_cwd() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().canonicalize().unwrap();
    make_venv(&root.join(".venv"));
    fs::create_dir(root.join("src")).unwrap();

    let out = pick_cmd(&root, &root, &[]);
    assert!(out.status.success(), "failed: {}", stderr(&out));
    assert_eq!(
        stdout(&out),
        format!("source {}/bin/activate", root.join(".venv").display())
    );
}

#[test]
fn test_search_ascends_from_subdirectory() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().canonicalize().unwrap();
    make_venv(&root.join("venv"));
    let nested = root.join("pkg").join("module");
    fs::create_dir_all(&nested).unwrap();

    let out = pick_cmd(&nested, &root, &[]);
    assert!(out.status.success(), "failed: {}", stderr(&out));
    assert_eq!(
        stdout(&out),
        format!("source {}/bin/activate", root.join("venv").display())
    );
}

#[test]
fn test_search_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let nested = tmp.path().join("a").join("b");
    fs::create_dir_all(&nested).unwrap();

    let out = pick_cmd(&nested, tmp.path(), &[]);
    assert!(!out.status.success());
    assert!(stdout(&out).is_empty());
    assert_eq!(
        stderr(&out).trim_end(),
        "No virtual environment found in this directory or parent directories."
    );
}

#[test]
fn test_search_ignores_deeper_venvs() {
    let tmp = tempfile::tempdir().unwrap();
    make_venv(&tmp.path().join("project").join("nested").join(".venv"));

    let out = pick_cmd(tmp.path(), tmp.path(), &[]);
    assert!(!out.status.success());
    assert!(stdout(&out).is_empty());
}

#[test]
fn test_search_multiple_without_terminal_fails() {
    let tmp = tempfile::tempdir().unwrap();
    make_venv(&tmp.path().join("one"));
    make_venv(&tmp.path().join("two"));

    // `output()` pipes stderr, so there is no terminal to draw the picker on.
    let out = pick_cmd(tmp.path(), tmp.path(), &[]);
    assert!(!out.status.success());
    assert!(stdout(&out).is_empty());
    assert!(
        stderr(&out).contains("selection UI failed"),
        "unexpected: {}",
        stderr(&out)
    );
}

#[test]
fn test_quiet_suppresses_status() {
    let tmp = tempfile::tempdir().unwrap();
    make_venv(&tmp.path().join("env"));

    let out = pick_cmd(tmp.path(), tmp.path(), &["--quiet", "env"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "source env/bin/activate");
    assert!(!stderr(&out).contains("Activating"));
}

// ── Hooks ───────────────────────────────────────────────────────

#[test]
fn test_hook_bash() {
    let tmp = tempfile::tempdir().unwrap();
    let out = pick_cmd(tmp.path(), tmp.path(), &["--hook", "bash"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("venv_pick()"));
}

#[test]
fn test_hook_unsupported_shell() {
    let tmp = tempfile::tempdir().unwrap();
    let out = pick_cmd(tmp.path(), tmp.path(), &["--hook", "fish"]);
    assert!(!out.status.success());
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("Unsupported shell 'fish'"));
}

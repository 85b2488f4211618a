//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify exit codes and
//! output shapes. TICKDOWN_ENV=dev keeps them out of the real data dir.

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "tickdown-cli", "--quiet", "--"])
        .args(args)
        .env("TICKDOWN_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_config_path() {
    let (stdout, _, code) = run_cli(&["config", "path"]);
    assert_eq!(code, 0, "config path failed");
    assert!(stdout.contains("config.toml"));
}

#[test]
fn test_config_show() {
    let (stdout, _, code) = run_cli(&["config", "show"]);
    assert_eq!(code, 0, "config show failed");
    assert!(stdout.contains("[timer]"));
    assert!(stdout.contains("total_secs"));
}

#[test]
fn test_config_reset() {
    let (stdout, _, code) = run_cli(&["config", "reset"]);
    assert_eq!(code, 0, "config reset failed");
    assert!(stdout.contains("config.toml"));
}

#[test]
fn test_run_exits_when_stdin_closes() {
    // Closed stdin ends the control loop even while the clock is paused.
    let (_, _, code) = run_cli(&["run", "--seconds", "5", "--paused"]);
    assert_eq!(code, 0, "run with closed stdin failed");
}

#[test]
fn test_run_rejects_invalid_seconds() {
    let (_, stderr, code) = run_cli(&["run", "--seconds", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("total_secs"));
}

#[test]
fn test_run_rejects_bad_redirect_url() {
    let (_, stderr, code) = run_cli(&["run", "--redirect-url", "not a url", "--paused"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("redirect_url"));
}

//! Basic CLI E2E tests.
//!
//! Each test runs the binary against its own data directory via
//! PETLOG_DATA_DIR, so tests stay independent and parallel-safe.

use std::path::Path;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "petlog-cli", "--"])
        .args(args)
        .env("PETLOG_DATA_DIR", data_dir)
        .output()
        .expect("failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_cli_success(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "CLI command failed: {args:?}\nstderr: {stderr}");
    stdout
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time should be after unix epoch")
        .as_millis() as i64
}

#[test]
fn record_then_summary_counts_the_event() {
    let dir = tempfile::tempdir().unwrap();
    run_cli_success(
        dir.path(),
        &["record", "--owner", "u1", "--duration", "120"],
    );

    let stdout = run_cli_success(
        dir.path(),
        &["stats", "summary", "--owner", "u1", "--period", "day"],
    );
    let summary: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(summary["count"], 1);
    assert_eq!(summary["sum_secs"], 120);
}

#[test]
fn rank_lists_the_recorded_owner() {
    let dir = tempfile::tempdir().unwrap();
    run_cli_success(dir.path(), &["record", "--owner", "u1"]);
    run_cli_success(dir.path(), &["record", "--owner", "u1"]);

    let stdout = run_cli_success(dir.path(), &["rank", "--period", "total"]);
    let ranking: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let list = ranking["list"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["owner_id"], "u1");
    assert_eq!(list[0]["total_count"], 2);
}

#[test]
fn stale_pet_triggers_inactivity_reminder() {
    let dir = tempfile::tempdir().unwrap();
    let old_end = (now_ms() - 60 * 3_600_000).to_string();
    run_cli_success(
        dir.path(),
        &["record", "--owner", "u1", "--pet", "rex", "--end-ms", &old_end],
    );

    let stdout = run_cli_success(dir.path(), &["remind", "check", "--owner", "u1"]);
    assert!(stdout.contains("no_record_48h"), "got: {stdout}");
}

#[test]
fn invalid_period_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(
        dir.path(),
        &["stats", "summary", "--owner", "u1", "--period", "fortnight"],
    );
    assert_ne!(code, 0);
    assert!(stderr.contains("invalid period"), "got: {stderr}");
}

#[test]
fn config_set_and_get_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    run_cli_success(dir.path(), &["config", "set", "ranking.page_size", "50"]);
    let stdout = run_cli_success(dir.path(), &["config", "get", "ranking.page_size"]);
    assert_eq!(stdout.trim(), "50");
}

// Integration tests for the failure flag commands
// These drive the binary end-to-end against a temporary work directory

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper to create a new command with an isolated HOME and work directory
fn new_cmd(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("buildwatch").unwrap();
    cmd.env("HOME", temp_dir.path());
    cmd.arg("--work-dir").arg(temp_dir.path().join("master"));
    cmd
}

#[test]
fn test_fresh_builder_succeeded() {
    let temp_dir = TempDir::new().unwrap();

    new_cmd(&temp_dir)
        .args(["status", "Linux"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Linux: last build succeeded"));
}

#[test]
fn test_fail_then_status() {
    let temp_dir = TempDir::new().unwrap();

    new_cmd(&temp_dir)
        .args(["fail", "Linux"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marked last build of 'Linux' as failed"));

    assert!(temp_dir.path().join("master").join("Linux.failed").exists());

    new_cmd(&temp_dir)
        .args(["status", "Linux"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Linux: last build failed"));
}

#[test]
fn test_fail_twice_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();

    new_cmd(&temp_dir).args(["fail", "Mac"]).assert().success();
    new_cmd(&temp_dir).args(["fail", "Mac"]).assert().success();

    new_cmd(&temp_dir)
        .args(["status", "Mac"])
        .assert()
        .success()
        .stdout(predicate::str::contains("last build failed"));
}

#[test]
fn test_fail_forget_status() {
    let temp_dir = TempDir::new().unwrap();

    new_cmd(&temp_dir).args(["fail", "Win32"]).assert().success();
    new_cmd(&temp_dir)
        .args(["forget", "Win32"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Forgot failed build of 'Win32'"));

    new_cmd(&temp_dir)
        .args(["status", "Win32"])
        .assert()
        .success()
        .stdout(predicate::str::contains("last build succeeded"));
}

#[test]
fn test_forget_without_failure() {
    let temp_dir = TempDir::new().unwrap();

    new_cmd(&temp_dir)
        .args(["forget", "Linux"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No failed build recorded for 'Linux'"));
}

#[test]
fn test_status_json() {
    let temp_dir = TempDir::new().unwrap();
    new_cmd(&temp_dir).args(["fail", "Linux"]).assert().success();

    let output = new_cmd(&temp_dir)
        .args(["status", "Linux", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["builder"], "Linux");
    assert_eq!(value["last_build"], "failed");
}

#[test]
fn test_record_failure_flags_builder() {
    let temp_dir = TempDir::new().unwrap();

    new_cmd(&temp_dir)
        .args(["record", "Linux", "success"])
        .assert()
        .success()
        .stdout(predicate::str::contains("last build succeeded"));

    new_cmd(&temp_dir)
        .args(["record", "Linux", "exception"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Step failed"));

    new_cmd(&temp_dir)
        .args(["record", "Linux", "warnings"])
        .assert()
        .success()
        .stdout(predicate::str::contains("last build failed"));
}

#[test]
fn test_clean_nukes_once_after_failure() {
    let temp_dir = TempDir::new().unwrap();

    new_cmd(&temp_dir)
        .args(["clean", "Linux"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("clean: Clean"));

    new_cmd(&temp_dir).args(["fail", "Linux"]).assert().success();

    new_cmd(&temp_dir)
        .args(["clean", "Linux"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nuke: Nuke Repository (Previous Failed) [--nuke]"));

    new_cmd(&temp_dir)
        .args(["clean", "Linux"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("clean: Clean"));
}

#[test]
fn test_clean_try_slave_keeps_flag() {
    let temp_dir = TempDir::new().unwrap();
    new_cmd(&temp_dir).args(["fail", "LinuxTry"]).assert().success();

    new_cmd(&temp_dir)
        .args(["clean", "LinuxTry", "--try-slave"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("clean: Clean"));

    new_cmd(&temp_dir)
        .args(["status", "LinuxTry"])
        .assert()
        .success()
        .stdout(predicate::str::contains("last build failed"));
}

#[test]
fn test_work_dir_from_rc_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = temp_dir.path().join(".buildwatch");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("rc"), "master.work_dir=flags\n").unwrap();

    let mut cmd = Command::cargo_bin("buildwatch").unwrap();
    cmd.env("HOME", temp_dir.path())
        .args(["fail", "Linux"])
        .assert()
        .success();

    assert!(config_dir.join("flags").join("Linux.failed").exists());
}

//! Corruption recovery tests for fitlog.
//!
//! These tests verify the system can handle:
//! - Corrupted users files
//! - Missing files
//! - Partial writes
//! - Records that break registry rules

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cli() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fitlog"));
    cmd.env("XDG_CONFIG_HOME", std::env::temp_dir().join("fitlog-test-no-config"));
    cmd
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

#[test]
fn test_corrupted_users_file() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    let users_path = data_dir.join("users.json");
    fs::write(&users_path, "{ invalid json }}}}").expect("Failed to write corrupted users");

    // Corrupted file reads as an empty registry
    cli()
        .arg("users")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No users yet"))
        .stderr(predicate::str::contains("Failed to parse users file"));

    // The next write replaces it with a valid file
    cli()
        .arg("new-user")
        .arg("alice")
        .arg("--weight")
        .arg("70")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success();

    let content = fs::read_to_string(&users_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).expect("valid JSON");
    assert_eq!(parsed.as_array().unwrap().len(), 1);
}

#[test]
fn test_truncated_users_file() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    // Simulate a crash halfway through a write
    fs::write(
        data_dir.join("users.json"),
        r#"[{"username": "alice", "weight": 70, "activities": [["2021-07-27", "runn"#,
    )
    .unwrap();

    cli()
        .arg("users")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No users yet"));
}

#[test]
fn test_empty_users_file() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::write(data_dir.join("users.json"), "").unwrap();

    cli()
        .arg("new-user")
        .arg("alice")
        .arg("--weight")
        .arg("70")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success();
}

#[test]
fn test_missing_data_dir_is_created() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("does").join("not").join("exist");

    cli()
        .arg("new-user")
        .arg("alice")
        .arg("--weight")
        .arg("70")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    assert!(data_dir.join("users.json").exists());
}

#[test]
fn test_invalid_records_are_skipped() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::write(
        data_dir.join("users.json"),
        r#"[
            {"username": "alice", "weight": 70, "activities": []},
            {"username": "zero", "weight": 0, "activities": []},
            {"username": "alice", "weight": 99, "activities": []}
        ]"#,
    )
    .unwrap();

    cli()
        .arg("users")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout("alice\n")
        .stderr(predicate::str::contains("Skipping"));
}

#[test]
fn test_hand_written_file_is_readable() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::write(
        data_dir.join("users.json"),
        r#"[{"username": "carol", "weight": 61, "activities": [["2021-08-01", "walking", 31.5]]}]"#,
    )
    .unwrap();

    cli()
        .arg("show")
        .arg("carol")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("2021-08-01"))
        .stdout(predicate::str::contains("32 kcal"));
}

#[test]
fn test_permission_denied_users_file() {
    // Skip on Windows (permission model is different)
    if cfg!(windows) {
        return;
    }

    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    let users_path = data_dir.join("users.json");
    fs::write(&users_path, "[]").unwrap();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&users_path).unwrap().permissions();
        perms.set_mode(0o000); // No permissions
        fs::set_permissions(&users_path, perms).unwrap();

        // An unreadable file is treated like a missing one
        cli()
            .arg("users")
            .arg("--data-dir")
            .arg(data_dir)
            .assert()
            .success();

        // Clean up permissions for temp dir cleanup
        let mut perms = fs::metadata(&users_path).unwrap().permissions();
        perms.set_mode(0o644);
        fs::set_permissions(&users_path, perms).unwrap();
    }
}

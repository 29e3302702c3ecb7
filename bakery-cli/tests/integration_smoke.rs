//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_top_level_help_lists_commands() {
    let mut cmd = Command::cargo_bin("bakery").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("init-db"))
        .stdout(predicate::str::contains("check-db"));
}

#[test]
fn test_serve_help() {
    let mut cmd = Command::cargo_bin("bakery").unwrap();
    cmd.arg("serve").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--in-memory"))
        .stdout(predicate::str::contains("--init-db"))
        .stdout(predicate::str::contains("Port to listen on"));
}

#[test]
fn test_check_db_help() {
    let mut cmd = Command::cargo_bin("bakery").unwrap();
    cmd.arg("check-db").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Print the result as JSON"));
}

#[test]
fn test_in_memory_conflicts_with_init_db() {
    let mut cmd = Command::cargo_bin("bakery").unwrap();
    cmd.args(["serve", "--in-memory", "--init-db"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_unknown_command_fails() {
    let mut cmd = Command::cargo_bin("bakery").unwrap();
    cmd.arg("bake");

    cmd.assert().failure();
}

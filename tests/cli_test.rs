//! CLI surface tests

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_subcommands() {
    let mut cmd = Command::cargo_bin("vizstream").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("visualize"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn test_analyze_requires_prompt() {
    let mut cmd = Command::cargo_bin("vizstream").unwrap();
    cmd.args(["analyze", "data.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--prompt"));
}

#[test]
fn test_unknown_subcommand_fails() {
    let mut cmd = Command::cargo_bin("vizstream").unwrap();
    cmd.arg("frobnicate").assert().failure();
}

#[test]
fn test_explicit_missing_config_fails() {
    let mut cmd = Command::cargo_bin("vizstream").unwrap();
    cmd.args(["--config", "/no/such/config.yaml", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"));
}

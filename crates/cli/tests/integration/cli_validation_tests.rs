//! CLI argument validation tests.
//!
//! These tests verify that the CLI properly validates arguments and provides
//! helpful error messages without requiring a node.

use predicates::prelude::*;

use super::helpers::vaultcheck_cmd;

#[test]
fn test_help_output() {
    vaultcheck_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("vaultcheck"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("fee"));
}

#[test]
fn test_run_help_lists_scenarios() {
    vaultcheck_cmd()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--epsilon"))
        .stdout(predicate::str::contains("vaulting"))
        .stdout(predicate::str::contains("boosted"));
}

#[test]
fn test_invalid_command() {
    vaultcheck_cmd()
        .arg("invalid_command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_run_missing_config() {
    vaultcheck_cmd()
        .args(["run", "--rpc-url", "http://localhost:8545"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_run_missing_rpc_url() {
    vaultcheck_cmd()
        .args(["run", "--config", "deployment.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--rpc-url"));
}

#[test]
fn test_invalid_scenario_value() {
    vaultcheck_cmd()
        .args([
            "run",
            "--config",
            "deployment.json",
            "--rpc-url",
            "http://localhost:8545",
            "--scenario",
            "lending",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_invalid_format_value() {
    vaultcheck_cmd()
        .args(["--format", "xml", "fee", "--amount", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_fee_missing_amount() {
    vaultcheck_cmd()
        .arg("fee")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

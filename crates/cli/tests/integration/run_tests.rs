//! `run` command failures that happen before any sandbox is spawned.

use predicates::prelude::*;

use super::helpers::{fixture_path, vaultcheck_cmd};

#[test]
fn test_run_rejects_invalid_config_before_spawning() {
    vaultcheck_cmd()
        .args([
            "run",
            "--rpc-url",
            "http://localhost:1",
            "--config",
            &fixture_path("legacy"),
            "--config",
            &fixture_path("legacy_with_boost"),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("legacy_with_boost.json"))
        .stderr(predicate::str::contains("boost pools require a boosted router"));
}

#[test]
fn test_run_rejects_invalid_epsilon() {
    vaultcheck_cmd()
        .args([
            "run",
            "--rpc-url",
            "http://localhost:1",
            "--config",
            &fixture_path("legacy"),
            "--epsilon",
            "lots",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid amount lots"));
}

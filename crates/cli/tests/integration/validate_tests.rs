//! `validate` command tests.

use predicates::prelude::*;

use super::helpers::{fixture_path, vaultcheck_cmd};

#[test]
fn test_validate_legacy_summary() {
    vaultcheck_cmd()
        .args(["validate", "--config", &fixture_path("legacy")])
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"))
        .stdout(predicate::str::contains("Kind:        legacy"))
        .stdout(predicate::str::contains("(existing)"))
        .stdout(predicate::str::contains("Source:      config"))
        .stdout(predicate::str::contains("Journey:     vaulting"))
        .stdout(predicate::str::contains("deposit[1]"))
        .stdout(predicate::str::contains("assert_empty[0]"))
        .stdout(predicate::str::contains("Boost").not());
}

#[test]
fn test_validate_boosted_summary_lists_boost_steps() {
    vaultcheck_cmd()
        .args(["validate", "--config", &fixture_path("boosted")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Kind:        boosted"))
        .stdout(predicate::str::contains("Recipient:"))
        .stdout(predicate::str::contains("Journey:     boosted"))
        .stdout(predicate::str::contains("enable_boost[0]"))
        .stdout(predicate::str::contains("harvest_boost[0]"))
        .stdout(predicate::str::contains("deposit[3]"));
}

#[test]
fn test_validate_json_resolves_artifacts() {
    let output = vaultcheck_cmd()
        .args(["--format", "json", "validate", "--config", &fixture_path("boosted")])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["router_kind"], "boosted");
    assert_eq!(json["scenario"]["depositors"], 4);
    assert_eq!(json["fees"]["withdraw"]["withdraw_fee_factor"], 9990);

    let artifact = json["strategy"]["artifact"].as_str().unwrap();
    assert!(artifact.starts_with(env!("CARGO_MANIFEST_DIR")), "{artifact}");
    assert!(artifact.ends_with("Strategy.json"), "{artifact}");
}

#[test]
fn test_validate_rejects_boost_on_legacy_router() {
    vaultcheck_cmd()
        .args(["validate", "--config", &fixture_path("legacy_with_boost")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid deployment config"))
        .stderr(predicate::str::contains("boost pools require a boosted router"));
}

#[test]
fn test_validate_missing_file() {
    vaultcheck_cmd()
        .args(["validate", "--config", "/nonexistent/deployment.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config"));
}

#[test]
fn test_validate_malformed_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ \"name\": ").unwrap();

    vaultcheck_cmd()
        .args(["validate", "--config", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}

//! `fee` command tests.

use predicates::prelude::*;

use super::helpers::vaultcheck_cmd;

#[test]
fn test_fee_default_schedule() {
    vaultcheck_cmd()
        .args(["fee", "--amount", "50000000000000000000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Withdraw fee 0.1% (9990/10000)"))
        .stdout(predicate::str::contains("49.95"))
        .stdout(predicate::str::contains("50000000000000000"));
}

#[test]
fn test_fee_json_output() {
    let output = vaultcheck_cmd()
        .args(["--format", "json", "fee", "--amount", "50", "--factor", "9500"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["schedule"]["withdraw_fee_factor"], 9500);
    assert_eq!(json["schedule"]["withdraw_fee_factor_max"], 10000);
    // floor(50 * 500 / 10000) = 2
    assert_eq!(json["fee"], "0x2");
    assert_eq!(json["received"], "0x30");
}

#[test]
fn test_fee_rejects_factor_above_max() {
    vaultcheck_cmd()
        .args(["fee", "--amount", "1000", "--factor", "10001"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid fee schedule"));
}

#[test]
fn test_fee_rejects_fractional_amount() {
    vaultcheck_cmd()
        .args(["fee", "--amount", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid amount 1.5"));
}

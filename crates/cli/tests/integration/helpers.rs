//! Test helper utilities for CLI integration tests.

#![allow(deprecated)] // Command::cargo_bin deprecation

use assert_cmd::Command;

/// Create a CLI command with colors and RPC settings cleared.
pub fn vaultcheck_cmd() -> Command {
    let mut cmd = Command::cargo_bin("vaultcheck").unwrap();
    cmd.env("NO_COLOR", "1")
        .env_remove("ETH_RPC_URL")
        .env_remove("FORK_BLOCK_NUMBER")
        .env_remove("RUST_LOG");
    cmd
}

/// Absolute path of a fixture config.
pub fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}.json", env!("CARGO_MANIFEST_DIR"), name)
}

//! Integration tests for loading deployment configs from disk.

use std::path::PathBuf;

use alloy_chains::NamedChain;
use alloy_primitives::{address, U256};
use vault_harness_config::{
    ConfigError, ConstructorArgs, ContractSource, DeploymentConfig, RouterKind,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_load_boosted_fixture() {
    let config = DeploymentConfig::from_json_file(fixture("boosted.json")).unwrap();

    assert_eq!(config.name, "dinoswap-usdc-weth");
    assert_eq!(config.chain, NamedChain::Polygon);
    assert_eq!(config.router_kind, RouterKind::Boosted);
    assert_eq!(config.strategy.constructor, ConstructorArgs::VaultRouter);
    assert!(config.strategy.deployment_data.is_some());
    assert_eq!(
        config.fees.recipient,
        Some(address!("5386881b46C37CdD30A748f7771CF95D7B213637"))
    );
    assert_eq!(
        config.funding.balance_slots.get(&config.wrapped_native),
        Some(&3)
    );
    let reward_path = &config.funding.swap_paths[&address!("76bF0C28e604CC3fE9967c83b3C3F31c213cfE64")];
    assert_eq!(reward_path.len(), 3);
    assert_eq!(reward_path[0], config.wrapped_native);

    // Unset scenario fields keep their defaults.
    assert_eq!(config.scenario.earn_delay_blocks, 100);
    assert_eq!(config.scenario.boost_warmup_blocks, 10);
    assert_eq!(config.scenario.boost_accrual_blocks, 1_000);
    assert_eq!(config.scenario.depositors, 4);

    let boost = config.boost.as_ref().unwrap();
    assert_eq!(boost.reward_funding, U256::from(10_000_000_000_000_000_000u128));
}

#[test]
fn test_artifacts_resolved_against_fixture_dir() {
    let config = DeploymentConfig::from_json_file(fixture("boosted.json")).unwrap();
    let dir = fixture("");

    assert_eq!(config.strategy.artifact, dir.join("artifacts/Strategy.json"));
    let ContractSource::Deploy { artifact, .. } = &config.vault_router else {
        unreachable!("fixture deploys the router");
    };
    assert_eq!(artifact, &dir.join("artifacts/VaultHealer.json"));
    assert_eq!(
        config.boost.unwrap().artifact,
        dir.join("artifacts/BoostPool.json")
    );
}

#[test]
fn test_missing_file_reports_path() {
    let err = DeploymentConfig::from_json_file(fixture("does-not-exist.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("does-not-exist.json"));
}

#[test]
fn test_round_trip_preserves_validation() {
    let config = DeploymentConfig::from_json_file(fixture("boosted.json")).unwrap();
    let json = serde_json::to_string(&config).unwrap();
    let reparsed = DeploymentConfig::from_json_str(&json).unwrap();
    assert_eq!(reparsed, config);
}

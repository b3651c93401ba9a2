//! Binding-layer tests against a local Anvil node.
//!
//! Run with: `cargo test --test e2e_anvil -- --ignored`
//! Requires the `anvil` binary on `PATH`.

use std::time::Duration;

use alloy::{
    node_bindings::{Anvil, AnvilInstance},
    primitives::{address, Address, U256},
    providers::{ext::AnvilApi, Provider},
};
use vault_harness_contracts::{
    connect, Artifact, Bindable, Binder, ContractError, Erc20, VaultHealer,
};

// Anvil's default account 0
const DEPLOYER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

// Init code that deploys a runtime returning 42 for any call.
const RETURNS_42: &str = "0x600a600c600039600a6000f3602a60005260206000f3";
// Init code that reverts immediately.
const REVERTS: &str = "0x60006000fd";

fn spawn_anvil() -> AnvilInstance {
    Anvil::new().try_spawn().expect("Failed to spawn Anvil")
}

fn artifact(name: &str, code: &str) -> Artifact {
    let json = format!(r#"{{ "contractName": "{name}", "bytecode": "{code}" }}"#);
    Artifact::from_json(format!("{name}.json"), &json).expect("valid artifact")
}

#[tokio::test]
#[ignore = "Requires anvil binary"]
async fn test_bind_rejects_address_without_code() {
    let anvil = spawn_anvil();
    let binder = Binder::new(connect(&anvil.endpoint()).unwrap());

    let result = binder.bind::<Erc20>(Address::repeat_byte(0x42)).await;
    assert!(matches!(result, Err(ContractError::NoCode(addr)) if addr == Address::repeat_byte(0x42)));
}

#[tokio::test]
#[ignore = "Requires anvil binary"]
async fn test_deploy_then_bind() {
    let anvil = spawn_anvil();
    let binder = Binder::new(connect(&anvil.endpoint()).unwrap());

    let deployed = binder
        .deploy(DEPLOYER, &artifact("Answer", RETURNS_42), &[])
        .await
        .expect("deployment succeeds");

    let handle: Erc20 = binder.bind(deployed).await.expect("code exists");
    assert_eq!(handle.address(), deployed);

    // Every call returns 42, so any uint256 getter decodes to 42.
    let balance = handle.balance_of(DEPLOYER).await.unwrap();
    assert_eq!(balance, U256::from(42));
}

#[tokio::test]
#[ignore = "Requires anvil binary"]
async fn test_reverting_constructor_is_deployment_failure() {
    let anvil = spawn_anvil();
    let binder = Binder::new(connect(&anvil.endpoint()).unwrap());

    let err = binder
        .deploy(DEPLOYER, &artifact("Broken", REVERTS), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, ContractError::DeploymentFailed(_)));
}

#[tokio::test]
#[ignore = "Requires anvil binary"]
async fn test_mutating_call_reverts_are_distinct_from_timeouts() {
    let anvil = spawn_anvil();
    let provider = connect(&anvil.endpoint()).unwrap();
    let binder = Binder::new(provider.clone()).with_call_timeout(Duration::from_secs(10));

    // Runtime code that always reverts.
    let reverting_runtime = address!("00000000000000000000000000000000000000aa");
    provider
        .anvil_set_code(reverting_runtime, vec![0x60, 0x00, 0x60, 0x00, 0xfd].into())
        .await
        .unwrap();

    let router: VaultHealer = binder.bind(reverting_runtime).await.unwrap();
    let err = router
        .deposit(DEPLOYER, U256::from(1), U256::from(50))
        .send()
        .await
        .unwrap_err();

    assert!(err.is_revert(), "expected a revert, got {err}");
    assert!(!err.is_timeout());
    assert!(provider.get_block_number().await.is_ok());
}

//! Integration tests for the contracts crate that need no node.

use std::io::Write;
use std::time::Duration;

use alloy::primitives::{Address, Bytes, U256};
use vault_harness_contracts::{
    connect, native_path, Artifact, Binder, ContractError, DEFAULT_CALL_TIMEOUT,
};

#[test]
fn test_binder_construction() {
    let binder = Binder::new(connect("http://localhost:8545").unwrap());
    assert_eq!(binder.call_timeout(), DEFAULT_CALL_TIMEOUT);

    let binder = binder.with_call_timeout(Duration::from_secs(5));
    assert_eq!(binder.call_timeout(), Duration::from_secs(5));
}

#[test]
fn test_connect_invalid_rpc_url() {
    let result = connect("not a valid url");
    assert!(matches!(result, Err(ContractError::RpcConnection(_))));
}

#[test]
fn test_artifact_load_from_disk() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"{{ "contractName": "Strategy", "abi": [], "bytecode": "0x600a600c600039600a6000f3602a60005260206000f3" }}"#
    )
    .unwrap();

    let artifact = Artifact::load(file.path()).unwrap();
    assert_eq!(artifact.name, "Strategy");
    assert_eq!(artifact.bytecode.len(), 22);

    let args = U256::from(7).to_be_bytes::<32>();
    let code: Bytes = artifact.deploy_code(&args);
    assert_eq!(code.len(), 22 + 32);
}

#[test]
fn test_artifact_invalid_json() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, "not json").unwrap();

    let err = Artifact::load(file.path()).unwrap_err();
    assert!(matches!(err, ContractError::Artifact { .. }));
}

#[test]
fn test_native_path_for_wrapped_native_is_empty() {
    let wnative = Address::repeat_byte(0x0d);
    assert!(native_path(wnative, wnative).is_empty());
}

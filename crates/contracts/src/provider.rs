//! Provider type used by every binding.

use alloy::providers::{DynProvider, Provider, ProviderBuilder};

use crate::error::{ContractError, Result};

/// Type-erased HTTP provider with the recommended fillers.
///
/// No wallet is attached: transactions go out as `eth_sendTransaction` with an
/// explicit `from`, which the sandbox node signs for its dev accounts and for
/// impersonated accounts.
pub type HarnessProvider = DynProvider;

/// Connect to a node over HTTP.
pub fn connect(rpc_url: &str) -> Result<HarnessProvider> {
    let url: url::Url = rpc_url
        .parse()
        .map_err(|e| ContractError::RpcConnection(format!("{}", e)))?;

    Ok(ProviderBuilder::new().connect_http(url).erased())
}

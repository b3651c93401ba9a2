//! The binding layer: turns an address into a typed, callable handle and
//! deploys new instances from compiled artifacts.

use std::future::IntoFuture;
use std::path::Path;
use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::Address;
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use tracing::{debug, info};

use crate::artifact::Artifact;
use crate::error::{ContractError, Result};
use crate::prepared_call::{contract_error, revert_reason, with_timeout, PreparedCall};
use crate::provider::HarnessProvider;

/// Default per-call timeout.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(60);

/// A typed contract handle that can be produced by [`Binder::bind`].
pub trait Bindable: Sized {
    /// Short contract kind used in logs, e.g. `"strategy"`.
    const KIND: &'static str;

    fn from_parts(address: Address, binder: Binder) -> Self;

    fn address(&self) -> Address;
}

/// Implements [`Bindable`] for a `{ address, binder }` handle.
macro_rules! impl_bindable {
    ($handle:ty, $kind:literal) => {
        impl $crate::binding::Bindable for $handle {
            const KIND: &'static str = $kind;

            fn from_parts(address: ::alloy::primitives::Address, binder: $crate::binding::Binder) -> Self {
                Self { address, binder }
            }

            fn address(&self) -> ::alloy::primitives::Address {
                self.address
            }
        }
    };
}
pub(crate) use impl_bindable;

/// Shared provider plus the per-call timeout every handle inherits.
#[derive(Clone)]
pub struct Binder {
    provider: HarnessProvider,
    call_timeout: Duration,
}

impl Binder {
    pub fn new(provider: HarnessProvider) -> Self {
        Self {
            provider,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn provider(&self) -> &HarnessProvider {
        &self.provider
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Bind a handle of kind `H` to `address`. Fails with
    /// [`ContractError::NoCode`] when nothing is deployed there.
    pub async fn bind<H: Bindable>(&self, address: Address) -> Result<H> {
        self.ensure_code(address).await?;
        debug!(kind = H::KIND, %address, "bound contract");
        Ok(H::from_parts(address, self.clone()))
    }

    /// Check that `address` holds bytecode.
    pub async fn ensure_code(&self, address: Address) -> Result<()> {
        let method = "eth_getCode";
        let code = with_timeout(method, self.call_timeout, async {
            self.provider
                .get_code_at(address)
                .await
                .map_err(|e| ContractError::Rpc {
                    method: method.to_string(),
                    reason: e.to_string(),
                })
        })
        .await?;

        if code.is_empty() {
            return Err(ContractError::NoCode(address));
        }
        Ok(())
    }

    /// Load an artifact from disk and deploy it.
    pub async fn deploy_artifact(
        &self,
        from: Address,
        path: impl AsRef<Path>,
        constructor_args: &[u8],
    ) -> Result<Address> {
        let artifact = Artifact::load(path)?;
        self.deploy(from, &artifact, constructor_args).await
    }

    /// Deploy `artifact` from `from`, returning the created address.
    ///
    /// Node and receipt failures surface as [`ContractError::DeploymentFailed`];
    /// exceeding the call timeout stays a [`ContractError::Timeout`].
    pub async fn deploy(
        &self,
        from: Address,
        artifact: &Artifact,
        constructor_args: &[u8],
    ) -> Result<Address> {
        let tx = TransactionRequest::default()
            .from(from)
            .with_deploy_code(artifact.deploy_code(constructor_args));
        let provider = &self.provider;

        let receipt = with_timeout(&artifact.name, self.call_timeout, async move {
            let pending = provider.send_transaction(tx).await.map_err(|e| {
                let reason = e
                    .as_error_resp()
                    .map(revert_reason)
                    .unwrap_or_else(|| e.to_string());
                ContractError::DeploymentFailed(reason)
            })?;
            pending
                .get_receipt()
                .await
                .map_err(|e| ContractError::DeploymentFailed(e.to_string()))
        })
        .await?;

        if !receipt.status() {
            return Err(ContractError::DeploymentFailed(format!(
                "{} creation reverted",
                artifact.name
            )));
        }
        let address = receipt.contract_address.ok_or_else(|| {
            ContractError::DeploymentFailed("receipt carries no contract address".to_string())
        })?;

        info!(contract = %artifact.name, %address, "deployed contract");
        Ok(address)
    }

    /// Run a view call under the per-call timeout.
    pub(crate) async fn read<T, F>(&self, method: &str, call: F) -> Result<T>
    where
        F: IntoFuture<Output = std::result::Result<T, alloy::contract::Error>>,
    {
        with_timeout(method, self.call_timeout, async {
            call.await.map_err(|e| contract_error(method, e))
        })
        .await
    }

    /// Build a mutating call from `from` to `to`.
    pub(crate) fn prepare<C: SolCall>(&self, to: Address, from: Address, call: C) -> PreparedCall<'_, C> {
        PreparedCall::new(to, from, call, self.call_timeout, &self.provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        let binder = Binder::new(crate::provider::connect("http://localhost:8545").unwrap());
        assert_eq!(binder.call_timeout(), Duration::from_secs(60));

        let binder = binder.with_call_timeout(Duration::from_millis(500));
        assert_eq!(binder.call_timeout(), Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_bind_unreachable_node_is_rpc_error() {
        // Nothing listens on port 9; the request fails at the transport.
        let binder = Binder::new(crate::provider::connect("http://127.0.0.1:9").unwrap())
            .with_call_timeout(Duration::from_secs(5));
        let result = binder.ensure_code(Address::repeat_byte(0x11)).await;

        assert!(matches!(
            result,
            Err(ContractError::Rpc { .. } | ContractError::Timeout { .. })
        ));
    }

    #[tokio::test]
    async fn test_deploy_against_silent_node_is_timeout() {
        // Accepts connections and never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let binder = Binder::new(crate::provider::connect(&format!("http://{addr}")).unwrap())
            .with_call_timeout(Duration::from_millis(200));
        let artifact =
            Artifact::from_json("Silent.json", r#"{"contractName":"Silent","bytecode":"0x6000"}"#)
                .unwrap();

        let result = binder.deploy(Address::repeat_byte(0x22), &artifact, &[]).await;
        match result {
            Err(ContractError::Timeout { method, after_ms }) => {
                assert_eq!(method, "Silent");
                assert_eq!(after_ms, 200);
            }
            other => unreachable!("expected timeout, got {other:?}"),
        }

        let code = binder.ensure_code(Address::repeat_byte(0x11)).await;
        assert!(matches!(code, Err(ContractError::Timeout { .. })));
    }
}

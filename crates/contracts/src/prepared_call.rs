//! Prepared call types for deferred transaction execution.
//!
//! `PreparedCall` is a transaction that has been constructed but not yet
//! sent. Sending it waits for the receipt under the per-call timeout and
//! turns node errors into [`ContractError`] variants, keeping timeouts and
//! reverts apart.

use std::future::Future;
use std::time::Duration;

use alloy::primitives::{Address, U256};
use alloy::providers::Provider;
use alloy::rpc::json_rpc::ErrorPayload;
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::sol_types::{decode_revert_reason, Revert, SolCall, SolError};
use alloy::transports::TransportError;
use tracing::debug;

use crate::error::{ContractError, Result};
use crate::provider::HarnessProvider;

/// A prepared transaction from a known sender.
///
/// # Example
///
/// ```rust,ignore
/// let receipt = router.deposit(user, vid, amount).send().await?;
///
/// // Or inspect before sending
/// let (addr, call) = token.approve(user, router, amount).prepare();
/// ```
pub struct PreparedCall<'a, C: SolCall> {
    to: Address,
    from: Address,
    call: C,
    value: U256,
    timeout: Duration,
    provider: &'a HarnessProvider,
}

impl<'a, C: SolCall> PreparedCall<'a, C> {
    /// Create a new prepared call with zero value.
    pub fn new(
        to: Address,
        from: Address,
        call: C,
        timeout: Duration,
        provider: &'a HarnessProvider,
    ) -> Self {
        Self {
            to,
            from,
            call,
            value: U256::ZERO,
            timeout,
            provider,
        }
    }

    /// Attach native value to the call.
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Consumes self and returns `(address, call)`.
    pub fn prepare(self) -> (Address, C) {
        (self.to, self.call)
    }

    /// Returns the target address for this call.
    pub fn to(&self) -> Address {
        self.to
    }

    /// Returns the sending identity.
    pub fn sender(&self) -> Address {
        self.from
    }

    /// Returns the value (native token) to send with this call.
    pub fn value(&self) -> U256 {
        self.value
    }

    /// Solidity signature of the call, e.g. `deposit(uint256,uint256)`.
    pub fn method(&self) -> &'static str {
        C::SIGNATURE
    }

    /// Sends the transaction and waits for a successful receipt.
    pub async fn send(self) -> Result<TransactionReceipt> {
        let method = C::SIGNATURE;
        let tx = TransactionRequest::default()
            .from(self.from)
            .to(self.to)
            .input(self.call.abi_encode().into())
            .value(self.value);
        let provider = self.provider;

        let receipt = with_timeout(method, self.timeout, async move {
            let pending = provider
                .send_transaction(tx)
                .await
                .map_err(|e| transport_error(method, &e))?;

            pending.get_receipt().await.map_err(|e| ContractError::Rpc {
                method: method.to_string(),
                reason: format!("Failed to get receipt: {}", e),
            })
        })
        .await?;

        if !receipt.status() {
            return Err(ContractError::CallReverted {
                method: method.to_string(),
                reason: "transaction reverted without a reason".to_string(),
            });
        }

        debug!(
            method,
            tx = %receipt.transaction_hash,
            gas_used = receipt.gas_used,
            "transaction mined"
        );
        Ok(receipt)
    }
}

/// Await `fut`, failing with [`ContractError::Timeout`] after `limit`.
pub(crate) async fn with_timeout<T, F>(method: &str, limit: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(ContractError::Timeout {
            method: method.to_string(),
            after_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}

/// Classify a transport error raised while sending or calling.
pub(crate) fn transport_error(method: &str, err: &TransportError) -> ContractError {
    match err.as_error_resp() {
        Some(payload) if is_execution_error(payload) => ContractError::CallReverted {
            method: method.to_string(),
            reason: revert_reason(payload),
        },
        _ => ContractError::Rpc {
            method: method.to_string(),
            reason: err.to_string(),
        },
    }
}

/// Classify an error from a `sol!` call builder.
pub(crate) fn contract_error(method: &str, err: alloy::contract::Error) -> ContractError {
    match err {
        alloy::contract::Error::TransportError(e) => transport_error(method, &e),
        other => ContractError::Rpc {
            method: method.to_string(),
            reason: other.to_string(),
        },
    }
}

/// Decoded `Error(string)`/`Panic(uint256)` reason, or the node's message.
pub(crate) fn revert_reason(payload: &ErrorPayload) -> String {
    payload
        .as_revert_data()
        .and_then(|data| decode_reason(&data))
        .unwrap_or_else(|| payload.message.to_string())
}

/// Plain `Error(string)` message when present, otherwise alloy's rendering
/// of panics and custom errors.
pub(crate) fn decode_reason(data: &[u8]) -> Option<String> {
    match Revert::abi_decode(data) {
        Ok(revert) => Some(revert.reason),
        Err(_) => decode_revert_reason(data),
    }
}

fn is_execution_error(payload: &ErrorPayload) -> bool {
    payload.as_revert_data().is_some() || payload.message.contains("revert")
}

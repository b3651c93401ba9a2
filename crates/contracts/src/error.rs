//! Error types for the contracts crate.

use std::path::PathBuf;

use alloy_primitives::Address;
use thiserror::Error;

/// Errors that can occur when binding, deploying or calling contracts.
#[derive(Debug, Error)]
pub enum ContractError {
    /// RPC connection failed.
    #[error("RPC connection failed: {0}")]
    RpcConnection(String),

    /// The node answered with something other than an execution error.
    #[error("RPC error in {method}: {reason}")]
    Rpc { method: String, reason: String },

    /// No bytecode at the address a handle was bound to.
    #[error("No contract code at {0}")]
    NoCode(Address),

    /// The call or transaction reverted.
    #[error("{method} reverted: {reason}")]
    CallReverted { method: String, reason: String },

    /// The call did not complete within the per-call timeout.
    #[error("{method} timed out after {after_ms}ms")]
    Timeout { method: String, after_ms: u64 },

    /// Contract creation failed; carries the node's reason verbatim.
    #[error("Deployment failed: {0}")]
    DeploymentFailed(String),

    /// A compiled artifact could not be read or has no bytecode.
    #[error("Invalid artifact {path}: {reason}")]
    Artifact { path: PathBuf, reason: String },
}

impl ContractError {
    /// Whether the error is a per-call timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Whether the error is an on-chain revert.
    pub fn is_revert(&self) -> bool {
        matches!(self, Self::CallReverted { .. })
    }
}

/// Result type alias for contract operations.
pub type Result<T> = std::result::Result<T, ContractError>;

//! Error types for the harness.

use serde::Serialize;
use thiserror::Error;
use vault_harness_config::ConfigError;
use vault_harness_contracts::ContractError;
use vault_harness_invariants::InvariantViolation;

/// How an error affects the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The sandbox itself failed: spawn, reset, cheatcodes or the node
    /// transport. Every later scenario shares it, so the run stops.
    Setup,
    /// A call reverted. Aborts the current scenario.
    Reverted,
    /// A call exceeded its timeout. Aborts the current scenario.
    Timeout,
    /// An accounting invariant failed. Recorded against the step; aborts
    /// the rest of the scenario.
    Invariant,
    /// The scenario's deployment cannot be used: invalid config, a bad
    /// artifact, no code at a configured address or a step without its
    /// prerequisite. Ends that scenario only.
    Config,
}

impl ErrorCategory {
    /// Whether the whole run must stop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Setup)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Reverted => "reverted",
            Self::Timeout => "timeout",
            Self::Invariant => "invariant",
            Self::Config => "config",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while running scenarios.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Sandbox setup failed.
    #[error("Setup failed: {0}")]
    Setup(String),

    /// A step ran before the step that provides its input.
    #[error("Step `{step}` requires {missing}, which no earlier step provided")]
    MissingPrerequisite {
        step: &'static str,
        missing: &'static str,
    },

    /// Contract interaction failed.
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// An invariant did not hold.
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),

    /// Deployment config error.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl HarnessError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Setup(_) => ErrorCategory::Setup,
            Self::MissingPrerequisite { .. } => ErrorCategory::Config,
            Self::Contract(err) => match err {
                ContractError::Timeout { .. } => ErrorCategory::Timeout,
                ContractError::CallReverted { .. } | ContractError::DeploymentFailed(_) => {
                    ErrorCategory::Reverted
                }
                ContractError::Artifact { .. } | ContractError::NoCode(_) => ErrorCategory::Config,
                ContractError::RpcConnection(_) | ContractError::Rpc { .. } => ErrorCategory::Setup,
            },
            Self::Invariant(_) => ErrorCategory::Invariant,
            Self::Config(_) => ErrorCategory::Config,
        }
    }
}

/// Result type alias for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;

//! Fork and runner settings.
//!
//! Fork settings are read from the environment with the same variables and
//! defaults the fork tests use:
//! - `ETH_RPC_URL` (required): the RPC URL to fork from
//! - `FORK_BLOCK_NUMBER` (optional): pin the fork to a block
//! - `ANVIL_COMPUTE_UNITS_PER_SECOND` (default: 100)
//! - `ANVIL_RETRIES` (default: 5)
//! - `ANVIL_FORK_RETRY_BACKOFF` (default: 1000): backoff in ms between retries
//! - `ANVIL_TIMEOUT` (default: 45000): timeout in ms for RPC requests
//! - `HARNESS_CALL_TIMEOUT_MS` (default: 60000): per-call timeout

use std::time::Duration;

use alloy_primitives::U256;
use vault_harness_contracts::DEFAULT_CALL_TIMEOUT;
use vault_harness_invariants::DEFAULT_EPSILON;

use crate::error::{HarnessError, Result};

/// Reads an env var, returning the default if not set or invalid.
pub(crate) fn env_var_or_default<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// How to spawn the forked sandbox node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForkSettings {
    pub rpc_url: String,
    pub block_number: Option<u64>,
    pub compute_units_per_second: u64,
    pub retries: u32,
    pub fork_retry_backoff_ms: u64,
    pub timeout_ms: u64,
}

impl ForkSettings {
    /// Fork `rpc_url` at its latest block with default rate limits.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            block_number: None,
            compute_units_per_second: 100,
            retries: 5,
            fork_retry_backoff_ms: 1_000,
            timeout_ms: 45_000,
        }
    }

    /// Read settings from the environment.
    pub fn from_env() -> Result<Self> {
        let rpc_url = std::env::var("ETH_RPC_URL")
            .map_err(|_| HarnessError::Setup("ETH_RPC_URL is not set".to_string()))?;
        let defaults = Self::new(rpc_url);

        Ok(Self {
            block_number: std::env::var("FORK_BLOCK_NUMBER")
                .ok()
                .and_then(|v| v.parse().ok()),
            compute_units_per_second: env_var_or_default(
                "ANVIL_COMPUTE_UNITS_PER_SECOND",
                defaults.compute_units_per_second,
            ),
            retries: env_var_or_default("ANVIL_RETRIES", defaults.retries),
            fork_retry_backoff_ms: env_var_or_default(
                "ANVIL_FORK_RETRY_BACKOFF",
                defaults.fork_retry_backoff_ms,
            ),
            timeout_ms: env_var_or_default("ANVIL_TIMEOUT", defaults.timeout_ms),
            ..defaults
        })
    }

    pub fn with_block_number(mut self, block_number: u64) -> Self {
        self.block_number = Some(block_number);
        self
    }
}

/// Knobs that apply to every scenario in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Bound on each contract call, send to receipt.
    pub call_timeout: Duration,
    /// Tolerance for max-sentinel withdrawals and share-value comparisons.
    pub epsilon: U256,
    /// Reset the fork before each scenario.
    pub reset_between_scenarios: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            call_timeout: DEFAULT_CALL_TIMEOUT,
            epsilon: DEFAULT_EPSILON,
            reset_between_scenarios: true,
        }
    }
}

impl RunnerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, with the call timeout taken from `HARNESS_CALL_TIMEOUT_MS`.
    pub fn from_env() -> Self {
        let default_ms = u64::try_from(DEFAULT_CALL_TIMEOUT.as_millis()).unwrap_or(60_000);
        let ms = env_var_or_default("HARNESS_CALL_TIMEOUT_MS", default_ms);
        Self::default().with_call_timeout(Duration::from_millis(ms))
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn with_epsilon(mut self, epsilon: U256) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_reset_between_scenarios(mut self, reset: bool) -> Self {
        self.reset_between_scenarios = reset;
        self
    }
}

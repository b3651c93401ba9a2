//! Per-deployment configuration consumed by the harness.
//!
//! A deployment config names every external contract a scenario touches:
//! the vault router, the strategy to register, the farm it stakes in, the
//! swap router used to build liquidity, and optionally a boost pool.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use alloy_chains::NamedChain;
use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use vault_harness_invariants::FeeSchedule;

use crate::error::{ConfigError, Result};

/// Maximum number of depositors a scenario may use (Anvil funds ten dev
/// accounts; the first one is reserved as the deployer).
pub const MAX_DEPOSITORS: usize = 9;

/// Method surface of the vault router under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouterKind {
    /// `addPool`, two-argument `deposit`/`withdraw`, `earnSome`, `stakedWantTokens`.
    Legacy,
    /// `createVault`, `deposit`/`withdraw` with trailing `bytes`, `earn`,
    /// ERC-1155 share balances and boost pools.
    Boosted,
}

impl RouterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Boosted => "boosted",
        }
    }
}

impl fmt::Display for RouterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constructor arguments appended to artifact bytecode at deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructorArgs {
    #[default]
    None,
    /// Pre-encoded ABI arguments.
    Raw(Bytes),
    /// `abi.encode(vaultRouter)`, for implementations bound to the router.
    VaultRouter,
}

/// Where a contract comes from: already on the forked chain, or deployed
/// from a compiled artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ContractSource {
    Existing {
        address: Address,
    },
    Deploy {
        artifact: PathBuf,
        #[serde(default)]
        constructor: ConstructorArgs,
    },
}

/// Strategy contract to register with the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Hardhat or Foundry JSON artifact with the strategy bytecode.
    pub artifact: PathBuf,
    #[serde(default)]
    pub constructor: ConstructorArgs,
    /// Encoded strategy configuration passed to `createVault` (boosted routers).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_data: Option<Bytes>,
}

/// Farm the strategy stakes into. Also the expected strategy registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmConfig {
    pub masterchef: Address,
    pub pid: u64,
    pub tolerance: u64,
}

/// Fee parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeConfig {
    pub withdraw: FeeSchedule,
    /// Prefer fee parameters read from the strategy; `withdraw` is the fallback.
    #[serde(default = "default_true")]
    pub read_live: bool,
    /// Account paid the performance fee on compounding, checked for a
    /// native balance increase after `earn`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<Address>,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            withdraw: FeeSchedule::default(),
            read_live: true,
            recipient: None,
        }
    }
}

/// How test identities are funded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingConfig {
    /// Native balance set on every signer.
    pub native_balance: U256,
    /// Native value swapped into each side of the LP pair per depositor.
    pub swap_value: U256,
    /// Known `balanceOf` mapping slots, for funding by storage write.
    #[serde(default)]
    pub balance_slots: BTreeMap<Address, u64>,
    /// Swap routes for tokens without a direct pair against wrapped native.
    /// Each path starts at `wrapped_native` and ends at its key.
    #[serde(default)]
    pub swap_paths: BTreeMap<Address, Vec<Address>>,
}

/// Boost pool created for the registered vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoostConfig {
    /// Boost pool implementation artifact.
    pub artifact: PathBuf,
    #[serde(default)]
    pub constructor: ConstructorArgs,
    /// Encoded `(rewardToken, rewardPerBlock, startBlock, endBlock)` init data.
    pub init_data: Bytes,
    pub reward_token: Address,
    /// Router used to buy reward tokens for the pool.
    pub reward_router: Address,
    /// Native value swapped into reward tokens and sent to the pool.
    pub reward_funding: U256,
}

/// Timing and population knobs for the built-in journeys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioParams {
    /// Blocks mined before each compounding call.
    pub earn_delay_blocks: u64,
    /// Blocks mined before enabling a boost.
    pub boost_warmup_blocks: u64,
    /// Blocks mined between two pending-reward reads.
    pub boost_accrual_blocks: u64,
    /// Number of depositing identities.
    pub depositors: usize,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            earn_delay_blocks: 100,
            boost_warmup_blocks: 10,
            boost_accrual_blocks: 1_000,
            depositors: 2,
        }
    }
}

/// Complete description of one target deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    pub name: String,
    pub chain: NamedChain,
    pub router_kind: RouterKind,
    pub vault_router: ContractSource,
    pub strategy: StrategyConfig,
    pub farm: FarmConfig,
    /// Router that builds the LP token and compounds earnings.
    pub swap_router: Address,
    /// LP token deposited into the vault.
    pub want: Address,
    /// Reward tokens paid by the farm; the first is the primary earned token.
    pub earned: Vec<Address>,
    pub wrapped_native: Address,
    #[serde(default)]
    pub fees: FeeConfig,
    pub funding: FundingConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost: Option<BoostConfig>,
    #[serde(default)]
    pub scenario: ScenarioParams,
}

impl DeploymentConfig {
    /// Parse and validate a config from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file.
    ///
    /// Relative artifact paths are resolved against the config file's directory.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json_str(&json)?;
        if let Some(base) = path.parent() {
            config.resolve_artifacts(base);
        }
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.earned.is_empty() {
            return Err(ConfigError::Invalid {
                field: "earned",
                reason: "at least one earned token is required".to_string(),
            });
        }
        if self.want.is_zero() {
            return Err(ConfigError::Invalid {
                field: "want",
                reason: "LP token address must be non-zero".to_string(),
            });
        }
        if self.funding.swap_value.is_zero() {
            return Err(ConfigError::Invalid {
                field: "funding.swap_value",
                reason: "must be non-zero to build liquidity".to_string(),
            });
        }
        for (token, path) in &self.funding.swap_paths {
            if path.len() < 2
                || path.first() != Some(&self.wrapped_native)
                || path.last() != Some(token)
            {
                return Err(ConfigError::Invalid {
                    field: "funding.swap_paths",
                    reason: format!(
                        "path for {token} must run from wrapped_native to {token} with at least two hops"
                    ),
                });
            }
        }
        if self.scenario.depositors == 0 || self.scenario.depositors > MAX_DEPOSITORS {
            return Err(ConfigError::Invalid {
                field: "scenario.depositors",
                reason: format!(
                    "{} is outside 1..={MAX_DEPOSITORS}",
                    self.scenario.depositors
                ),
            });
        }

        match self.router_kind {
            RouterKind::Boosted => {
                if self.strategy.deployment_data.is_none() {
                    return Err(ConfigError::Missing {
                        field: "strategy.deployment_data",
                        router_kind: RouterKind::Boosted.as_str(),
                    });
                }
            }
            RouterKind::Legacy => {
                if self.boost.is_some() {
                    return Err(ConfigError::Invalid {
                        field: "boost",
                        reason: "boost pools require a boosted router".to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// The primary reward token.
    pub fn primary_earned(&self) -> Address {
        self.earned.first().copied().unwrap_or_default()
    }

    pub fn has_boost(&self) -> bool {
        self.boost.is_some()
    }

    fn resolve_artifacts(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.strategy.artifact);
        if let ContractSource::Deploy { artifact, .. } = &mut self.vault_router {
            resolve(artifact);
        }
        if let Some(boost) = &mut self.boost {
            resolve(&mut boost.artifact);
        }
    }
}

fn default_true() -> bool {
    true
}

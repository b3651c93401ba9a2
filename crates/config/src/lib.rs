//! Deployment configuration for the yield-vault harness.
//!
//! This crate describes *what* a scenario runs against: router kind,
//! contract addresses and artifacts, fee schedule, funding amounts and
//! timing. It performs no chain I/O.

pub mod deployment;
pub mod error;
pub mod units;

pub use deployment::{
    BoostConfig, ConstructorArgs, ContractSource, DeploymentConfig, FarmConfig, FeeConfig,
    FundingConfig, RouterKind, ScenarioParams, StrategyConfig, MAX_DEPOSITORS,
};
pub use error::{ConfigError, Result};
pub use units::{fee_percent, format_amount, to_decimal, DEFAULT_DECIMALS};

//! Command implementations.

pub mod fee;
pub mod run;
pub mod validate;

pub use fee::run_fee;
pub use run::run_scenarios;
pub use validate::run_validate;

use alloy_primitives::U256;
use anyhow::{anyhow, Result};

/// Parse a base-unit amount given in decimal or `0x` hex.
pub(crate) fn parse_base_units(amount: &str) -> Result<U256> {
    amount
        .trim()
        .parse::<U256>()
        .map_err(|e| anyhow!("Invalid amount {}: {}", amount, e))
}

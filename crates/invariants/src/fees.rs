//! Withdrawal fee schedule.
//!
//! Vault strategies express the withdrawal fee as a factor over a fixed
//! denominator: a factor of `9990` over `10000` keeps 99.9% of the gross
//! amount and charges 0.1%. The fee itself is
//! `gross * (max - factor) / max`, truncated.

use std::fmt;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::error::FeeError;
use crate::math::mul_ratio_down;

/// Withdraw fee factor used by deployed strategies unless configured otherwise.
pub const DEFAULT_WITHDRAW_FEE_FACTOR: u64 = 9_990;

/// Denominator for the withdraw fee factor.
pub const WITHDRAW_FEE_FACTOR_MAX: u64 = 10_000;

/// A validated `factor / max` withdrawal fee schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFeeSchedule", into = "RawFeeSchedule")]
pub struct FeeSchedule {
    factor: u64,
    max: u64,
}

#[derive(Serialize, Deserialize)]
struct RawFeeSchedule {
    withdraw_fee_factor: u64,
    withdraw_fee_factor_max: u64,
}

impl TryFrom<RawFeeSchedule> for FeeSchedule {
    type Error = FeeError;

    fn try_from(raw: RawFeeSchedule) -> Result<Self, Self::Error> {
        Self::new(raw.withdraw_fee_factor, raw.withdraw_fee_factor_max)
    }
}

impl From<FeeSchedule> for RawFeeSchedule {
    fn from(schedule: FeeSchedule) -> Self {
        Self {
            withdraw_fee_factor: schedule.factor,
            withdraw_fee_factor_max: schedule.max,
        }
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            factor: DEFAULT_WITHDRAW_FEE_FACTOR,
            max: WITHDRAW_FEE_FACTOR_MAX,
        }
    }
}

impl FeeSchedule {
    /// Build a schedule from a retained factor and its denominator.
    pub fn new(factor: u64, max: u64) -> Result<Self, FeeError> {
        if max == 0 {
            return Err(FeeError::ZeroFactorMax);
        }
        if factor > max {
            return Err(FeeError::FactorExceedsMax { factor, max });
        }
        Ok(Self { factor, max })
    }

    /// Retained factor (numerator of the kept fraction).
    pub fn factor(&self) -> u64 {
        self.factor
    }

    /// Denominator shared by the factor and the fee.
    pub fn max(&self) -> u64 {
        self.max
    }

    /// Numerator of the charged fraction, `max - factor`.
    pub fn fee_numerator(&self) -> u64 {
        self.max - self.factor
    }

    /// Fee charged on a gross withdrawal, rounded down.
    pub fn withdraw_fee(&self, gross: U256) -> U256 {
        // max != 0 and fee_numerator <= max are guaranteed by construction.
        mul_ratio_down(gross, U256::from(self.fee_numerator()), U256::from(self.max))
            .unwrap_or(U256::ZERO)
    }

    /// Amount the withdrawer receives for a gross withdrawal.
    pub fn net_withdrawal(&self, gross: U256) -> U256 {
        gross - self.withdraw_fee(gross)
    }
}

impl fmt::Display for FeeSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.factor, self.max)
    }
}

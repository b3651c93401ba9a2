//! Error types for the invariants library.

use std::fmt;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Family of invariant that was checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvariantKind {
    /// Value moved between two balances with no fee.
    Conservation,
    /// Withdrawal received equals gross minus the floor-divided fee.
    FeeAdjustedConservation,
    /// Quantity strictly grew across a compounding or elapsed-time action.
    StrictIncrease,
    /// Quantity did not shrink.
    NonDecreasing,
    /// First deposit into an empty pool mints shares 1:1.
    FirstDeposit,
    /// Two reads are expected to match exactly.
    Equality,
    /// Position is empty after a full withdrawal.
    Emptied,
    /// Pool-wide deposited/withdrawn/fees accounting matches the locked total.
    LedgerBalance,
    /// Share:asset ratio did not decrease.
    ShareRatio,
}

impl fmt::Display for InvariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Conservation => "conservation",
            Self::FeeAdjustedConservation => "fee-adjusted conservation",
            Self::StrictIncrease => "strict increase",
            Self::NonDecreasing => "non-decreasing",
            Self::FirstDeposit => "first-deposit 1:1",
            Self::Equality => "equality",
            Self::Emptied => "emptied position",
            Self::LedgerBalance => "ledger balance",
            Self::ShareRatio => "share ratio",
        };
        f.write_str(name)
    }
}

/// Relation the actual value was expected to hold against the expected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    Eq,
    Gt,
    Ge,
    /// `|actual - expected| <= epsilon`
    Within(U256),
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq => f.write_str("=="),
            Self::Gt => f.write_str(">"),
            Self::Ge => f.write_str(">="),
            Self::Within(epsilon) => write!(f, "within {epsilon} of"),
        }
    }
}

/// A post-condition that did not hold after a scenario step.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error(
    "{kind} violated at step `{step}`: expected actual {relation} {expected}, got {actual} ({detail})"
)]
pub struct InvariantViolation {
    pub step: String,
    pub kind: InvariantKind,
    pub relation: Relation,
    pub expected: U256,
    pub actual: U256,
    pub detail: String,
}

/// Errors building a fee schedule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeeError {
    /// The fee factor denominator was zero.
    #[error("Withdraw fee factor max must be non-zero")]
    ZeroFactorMax,

    /// The fee factor exceeded its denominator.
    #[error("Withdraw fee factor {factor} exceeds max {max}")]
    FactorExceedsMax { factor: u64, max: u64 },
}

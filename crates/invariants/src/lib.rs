//! Invariant checks for yield-vault scenarios.
//!
//! This crate holds the arithmetic half of the harness: it never talks to a
//! chain. Callers take [`Snapshot`]s around each mutating step and hand them
//! to an [`InvariantChecker`], which reproduces the contracts' integer
//! rounding exactly and reports any mismatch as an [`InvariantViolation`].
//!
//! # Example
//!
//! ```
//! use alloy_primitives::U256;
//! use vault_harness_invariants::{FeeSchedule, InvariantChecker};
//!
//! let checker = InvariantChecker::new(FeeSchedule::default());
//! let gross = U256::from(1_000_000u64);
//!
//! // 0.1% withdraw fee, rounded down
//! assert!(checker.fee_adjusted("withdraw", gross, U256::from(999_000u64)).is_ok());
//! ```

pub mod check;
pub mod error;
pub mod fees;
pub mod ledger;
pub mod math;
pub mod snapshot;

pub use check::{CheckResult, InvariantChecker};
pub use error::{FeeError, InvariantKind, InvariantViolation, Relation};
pub use fees::{FeeSchedule, DEFAULT_WITHDRAW_FEE_FACTOR, WITHDRAW_FEE_FACTOR_MAX};
pub use ledger::{PoolLedger, ShareRatio};
pub use math::{abs_diff, mul_div_down, mul_ratio_down, within_epsilon, DEFAULT_EPSILON};
pub use snapshot::{Delta, Snapshot};

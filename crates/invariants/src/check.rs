//! Closed-form post-condition checks.
//!
//! An [`InvariantChecker`] carries the fee schedule and the rounding tolerance
//! for one pool, and turns before/after reads into either `Ok(())` or an
//! [`InvariantViolation`] that names the step and both values.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::error::{InvariantKind, InvariantViolation, Relation};
use crate::fees::FeeSchedule;
use crate::ledger::{PoolLedger, ShareRatio};
use crate::math::{within_epsilon, DEFAULT_EPSILON};
use crate::snapshot::Delta;

/// Result of a single invariant check.
pub type CheckResult = Result<(), InvariantViolation>;

/// Checks post-conditions against a known fee schedule and tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvariantChecker {
    fees: FeeSchedule,
    epsilon: U256,
}

impl Default for InvariantChecker {
    fn default() -> Self {
        Self::new(FeeSchedule::default())
    }
}

impl InvariantChecker {
    /// Checker with the given fee schedule and [`DEFAULT_EPSILON`].
    pub fn new(fees: FeeSchedule) -> Self {
        Self {
            fees,
            epsilon: DEFAULT_EPSILON,
        }
    }

    /// Override the tolerance used by the `*_within` checks.
    pub fn with_epsilon(mut self, epsilon: U256) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Replace the fee schedule, e.g. after reading live parameters.
    pub fn with_fees(mut self, fees: FeeSchedule) -> Self {
        self.fees = fees;
        self
    }

    pub fn fees(&self) -> &FeeSchedule {
        &self.fees
    }

    pub fn epsilon(&self) -> U256 {
        self.epsilon
    }

    /// What the receiver gained equals what the source lost.
    pub fn conservation(&self, step: &str, receiver: &Delta, source: &Delta) -> CheckResult {
        let gained = receiver.before.increase_to(&receiver.after);
        let lost = source.before.decrease_to(&source.after);
        if gained.is_some() && gained == lost {
            return Ok(());
        }
        let (lost, gained) = (source.lost(), receiver.gained());
        Err(violation(
            step,
            InvariantKind::Conservation,
            Relation::Eq,
            lost,
            gained,
            format!("{} gained == {} lost", receiver.after.label, source.before.label),
        ))
    }

    /// `received == gross - floor(gross * (max - factor) / max)`, exactly.
    pub fn fee_adjusted(&self, step: &str, gross: U256, received: U256) -> CheckResult {
        let expected = self.fees.net_withdrawal(gross);
        if received == expected {
            return Ok(());
        }
        Err(violation(
            step,
            InvariantKind::FeeAdjustedConservation,
            Relation::Eq,
            expected,
            received,
            format!("gross {gross}, fee {} at {}", self.fees.withdraw_fee(gross), self.fees),
        ))
    }

    /// Fee-adjusted conservation within the configured tolerance, for
    /// withdrawals whose gross amount passed through a share conversion.
    pub fn fee_adjusted_within(&self, step: &str, gross: U256, received: U256) -> CheckResult {
        let expected = self.fees.net_withdrawal(gross);
        if within_epsilon(expected, received, self.epsilon) {
            return Ok(());
        }
        Err(violation(
            step,
            InvariantKind::FeeAdjustedConservation,
            Relation::Within(self.epsilon),
            expected,
            received,
            format!("gross {gross}, fee {} at {}", self.fees.withdraw_fee(gross), self.fees),
        ))
    }

    /// Shares minted by the first deposit into an empty pool equal the deposit.
    pub fn first_deposit(&self, step: &str, deposited: U256, share_total: U256) -> CheckResult {
        if deposited == share_total {
            return Ok(());
        }
        Err(violation(
            step,
            InvariantKind::FirstDeposit,
            Relation::Eq,
            deposited,
            share_total,
            "share total == first deposit".to_string(),
        ))
    }

    /// Two reads of related quantities are identical.
    pub fn equal(&self, step: &str, what: &str, expected: U256, actual: U256) -> CheckResult {
        if expected == actual {
            return Ok(());
        }
        Err(violation(
            step,
            InvariantKind::Equality,
            Relation::Eq,
            expected,
            actual,
            what.to_string(),
        ))
    }

    /// Two reads agree within the configured tolerance.
    pub fn close_to(&self, step: &str, what: &str, expected: U256, actual: U256) -> CheckResult {
        if within_epsilon(expected, actual, self.epsilon) {
            return Ok(());
        }
        Err(violation(
            step,
            InvariantKind::Equality,
            Relation::Within(self.epsilon),
            expected,
            actual,
            what.to_string(),
        ))
    }

    /// The quantity grew. A flat reading is a failure: either accrual is
    /// broken or the elapsed interval was too short.
    pub fn strictly_increased(&self, step: &str, delta: &Delta) -> CheckResult {
        if delta.after.value > delta.before.value {
            return Ok(());
        }
        Err(violation(
            step,
            InvariantKind::StrictIncrease,
            Relation::Gt,
            delta.before.value,
            delta.after.value,
            format!(
                "{} over {} blocks",
                delta.after.label,
                delta.before.blocks_until(&delta.after)
            ),
        ))
    }

    /// The quantity did not shrink.
    pub fn non_decreasing(&self, step: &str, delta: &Delta) -> CheckResult {
        if delta.after.value >= delta.before.value {
            return Ok(());
        }
        Err(violation(
            step,
            InvariantKind::NonDecreasing,
            Relation::Ge,
            delta.before.value,
            delta.after.value,
            delta.after.label.clone(),
        ))
    }

    /// The position is exactly empty.
    pub fn emptied(&self, step: &str, what: &str, remaining: U256) -> CheckResult {
        if remaining.is_zero() {
            return Ok(());
        }
        Err(violation(
            step,
            InvariantKind::Emptied,
            Relation::Eq,
            U256::ZERO,
            remaining,
            what.to_string(),
        ))
    }

    /// The position is empty up to the configured tolerance.
    pub fn emptied_within(&self, step: &str, what: &str, remaining: U256) -> CheckResult {
        if remaining <= self.epsilon {
            return Ok(());
        }
        Err(violation(
            step,
            InvariantKind::Emptied,
            Relation::Within(self.epsilon),
            U256::ZERO,
            remaining,
            what.to_string(),
        ))
    }

    /// Deposited + compounded − withdrawn − fees equals the locked total.
    pub fn ledger_balanced(&self, step: &str, ledger: &PoolLedger, locked: U256) -> CheckResult {
        let expected = ledger.expected_locked();
        if within_epsilon(expected, locked, self.epsilon) {
            return Ok(());
        }
        Err(violation(
            step,
            InvariantKind::LedgerBalance,
            Relation::Within(self.epsilon),
            expected,
            locked,
            ledger.to_string(),
        ))
    }

    /// Assets per share did not fall between two observations.
    pub fn share_ratio_held(&self, step: &str, before: &ShareRatio, after: &ShareRatio) -> CheckResult {
        if after.is_at_least(before) {
            return Ok(());
        }
        Err(violation(
            step,
            InvariantKind::ShareRatio,
            Relation::Ge,
            before.assets_per_unit_share(),
            after.assets_per_unit_share(),
            format!("assets/share {before} -> {after}"),
        ))
    }
}

fn violation(
    step: &str,
    kind: InvariantKind,
    relation: Relation,
    expected: U256,
    actual: U256,
    detail: String,
) -> InvariantViolation {
    InvariantViolation {
        step: step.to_string(),
        kind,
        relation,
        expected,
        actual,
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Snapshot;

    fn delta(label: &str, before: u64, after: u64) -> Delta {
        Delta::new(
            Snapshot::new(label, U256::from(before), 100),
            Snapshot::new(label, U256::from(after), 200),
        )
    }

    #[test]
    fn test_conservation_holds_for_plain_transfer() {
        let checker = InvariantChecker::default();
        let receiver = delta("vault_shares_total", 0, 500);
        let source = delta("lp_balance", 800, 300);
        assert!(checker.conservation("deposit", &receiver, &source).is_ok());
    }

    #[test]
    fn test_conservation_detects_leak() {
        let checker = InvariantChecker::default();
        let receiver = delta("vault_shares_total", 0, 499);
        let source = delta("lp_balance", 800, 300);
        let err = checker.conservation("deposit", &receiver, &source).unwrap_err();
        assert_eq!(err.kind, InvariantKind::Conservation);
        assert_eq!(err.expected, U256::from(500));
        assert_eq!(err.actual, U256::from(499));
        assert_eq!(err.step, "deposit");
    }

    #[test]
    fn test_fee_adjusted_exact() {
        let checker = InvariantChecker::default();
        let gross = U256::from(1_000_000u64);
        // fee = 1_000_000 * 10 / 10_000 = 1_000
        assert!(checker.fee_adjusted("withdraw", gross, U256::from(999_000u64)).is_ok());

        let err = checker
            .fee_adjusted("withdraw", gross, U256::from(999_001u64))
            .unwrap_err();
        assert_eq!(err.kind, InvariantKind::FeeAdjustedConservation);
        assert_eq!(err.expected, U256::from(999_000u64));
        assert_eq!(err.actual, U256::from(999_001u64));
    }

    #[test]
    fn test_fee_adjusted_within_uses_epsilon() {
        let checker = InvariantChecker::default().with_epsilon(U256::from(5));
        let gross = U256::from(1_000_000u64);
        assert!(checker
            .fee_adjusted_within("withdraw-all", gross, U256::from(999_004u64))
            .is_ok());
        let err = checker
            .fee_adjusted_within("withdraw-all", gross, U256::from(999_006u64))
            .unwrap_err();
        assert_eq!(err.relation, Relation::Within(U256::from(5)));
    }

    #[test]
    fn test_first_deposit_one_to_one() {
        let checker = InvariantChecker::default();
        assert!(checker.first_deposit("deposit", U256::from(100), U256::from(100)).is_ok());
        assert!(checker.first_deposit("deposit", U256::from(100), U256::from(99)).is_err());
    }

    #[test]
    fn test_strict_increase_rejects_flat_reading() {
        let checker = InvariantChecker::default();
        assert!(checker.strictly_increased("earn", &delta("locked", 100, 101)).is_ok());

        let err = checker
            .strictly_increased("earn", &delta("locked", 100, 100))
            .unwrap_err();
        assert_eq!(err.kind, InvariantKind::StrictIncrease);
        assert_eq!(err.relation, Relation::Gt);
        assert!(err.detail.contains("100 blocks"));
    }

    #[test]
    fn test_non_decreasing_allows_flat_reading() {
        let checker = InvariantChecker::default();
        assert!(checker.non_decreasing("accrue", &delta("pending", 7, 7)).is_ok());
        assert!(checker.non_decreasing("accrue", &delta("pending", 7, 6)).is_err());
    }

    #[test]
    fn test_emptied_variants() {
        let checker = InvariantChecker::default().with_epsilon(U256::from(10));
        assert!(checker.emptied("withdraw-all", "shares", U256::ZERO).is_ok());
        assert!(checker.emptied("withdraw-all", "shares", U256::from(1)).is_err());
        assert!(checker.emptied_within("withdraw-all", "shares", U256::from(10)).is_ok());
        assert!(checker.emptied_within("withdraw-all", "shares", U256::from(11)).is_err());
    }

    #[test]
    fn test_close_to() {
        let checker = InvariantChecker::default().with_epsilon(U256::from(3));
        assert!(checker.close_to("deposit", "shares", U256::from(10), U256::from(13)).is_ok());
        assert!(checker.close_to("deposit", "shares", U256::from(10), U256::from(14)).is_err());
    }

    #[test]
    fn test_ledger_balanced() {
        let checker = InvariantChecker::default().with_epsilon(U256::ZERO);
        let mut ledger = PoolLedger::default();
        ledger.record_deposit(U256::from(1_000));
        ledger.record_compound(U256::from(50));
        ledger.record_withdrawal(U256::from(500), U256::from(499));

        assert!(checker.ledger_balanced("withdraw", &ledger, U256::from(550)).is_ok());
        let err = checker
            .ledger_balanced("withdraw", &ledger, U256::from(551))
            .unwrap_err();
        assert_eq!(err.kind, InvariantKind::LedgerBalance);
    }

    #[test]
    fn test_share_ratio_held() {
        let checker = InvariantChecker::default();
        let before = ShareRatio::new(U256::from(100), U256::from(100));
        let grown = ShareRatio::new(U256::from(110), U256::from(100));
        let shrunk = ShareRatio::new(U256::from(90), U256::from(100));

        assert!(checker.share_ratio_held("earn", &before, &grown).is_ok());
        assert!(checker.share_ratio_held("earn", &before, &before).is_ok());
        assert!(checker.share_ratio_held("earn", &before, &shrunk).is_err());
    }
}

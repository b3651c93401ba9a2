//! Pool-wide accounting observed across a scenario.

use std::fmt;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::math::{unit, wide_mul};

/// Running totals of everything that moved in or out of one pool.
///
/// The locked total of the pool must equal
/// `deposited + compounded - withdrawn_net - fees_paid` at every
/// observation point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolLedger {
    pub deposited: U256,
    /// Growth of the locked total attributed to compounding.
    pub compounded: U256,
    /// Amounts that reached withdrawers.
    pub withdrawn_net: U256,
    /// Withdrawal fees retained or forwarded by the pool.
    pub fees_paid: U256,
}

impl PoolLedger {
    pub fn record_deposit(&mut self, amount: U256) {
        self.deposited = self.deposited.saturating_add(amount);
    }

    pub fn record_compound(&mut self, growth: U256) {
        self.compounded = self.compounded.saturating_add(growth);
    }

    /// Record a withdrawal of `gross` locked assets of which `net` reached the user.
    pub fn record_withdrawal(&mut self, gross: U256, net: U256) {
        self.withdrawn_net = self.withdrawn_net.saturating_add(net);
        self.fees_paid = self.fees_paid.saturating_add(gross.saturating_sub(net));
    }

    /// Locked total implied by the recorded flows.
    pub fn expected_locked(&self) -> U256 {
        self.deposited
            .saturating_add(self.compounded)
            .saturating_sub(self.withdrawn_net)
            .saturating_sub(self.fees_paid)
    }
}

impl fmt::Display for PoolLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "deposited {} + compounded {} - withdrawn {} - fees {}",
            self.deposited, self.compounded, self.withdrawn_net, self.fees_paid
        )
    }
}

/// Assets backing a share supply at one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRatio {
    pub assets: U256,
    pub shares: U256,
}

impl ShareRatio {
    pub fn new(assets: U256, shares: U256) -> Self {
        Self { assets, shares }
    }

    /// `self.assets / self.shares >= earlier.assets / earlier.shares`,
    /// compared by cross-multiplication in 512 bits.
    ///
    /// An empty share supply on either side carries no ratio and compares true.
    pub fn is_at_least(&self, earlier: &ShareRatio) -> bool {
        if self.shares.is_zero() || earlier.shares.is_zero() {
            return true;
        }
        wide_mul(self.assets, earlier.shares) >= wide_mul(earlier.assets, self.shares)
    }

    /// Assets per `1e18` shares, truncated. For display only.
    pub fn assets_per_unit_share(&self) -> U256 {
        if self.shares.is_zero() {
            return U256::ZERO;
        }
        self.assets.saturating_mul(unit(18)) / self.shares
    }
}

impl fmt::Display for ShareRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.assets, self.shares)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_locked_tracks_flows() {
        let mut ledger = PoolLedger::default();
        ledger.record_deposit(U256::from(100));
        assert_eq!(ledger.expected_locked(), U256::from(100));

        ledger.record_compound(U256::from(7));
        ledger.record_withdrawal(U256::from(50), U256::from(49));
        assert_eq!(ledger.fees_paid, U256::from(1));
        assert_eq!(ledger.withdrawn_net, U256::from(49));
        assert_eq!(ledger.expected_locked(), U256::from(57));
    }

    #[test]
    fn test_ledger_display() {
        let mut ledger = PoolLedger::default();
        ledger.record_deposit(U256::from(10));
        assert_eq!(
            ledger.to_string(),
            "deposited 10 + compounded 0 - withdrawn 0 - fees 0"
        );
    }

    #[test]
    fn test_share_ratio_comparison_without_overflow() {
        let earlier = ShareRatio::new(U256::MAX, U256::MAX);
        let later = ShareRatio::new(U256::MAX, U256::MAX - U256::from(1));
        assert!(later.is_at_least(&earlier));
        assert!(!earlier.is_at_least(&later));
    }

    #[test]
    fn test_share_ratio_empty_supply_compares_true() {
        let empty = ShareRatio::new(U256::ZERO, U256::ZERO);
        let some = ShareRatio::new(U256::from(5), U256::from(5));
        assert!(empty.is_at_least(&some));
        assert!(some.is_at_least(&empty));
        assert_eq!(empty.assets_per_unit_share(), U256::ZERO);
    }

    #[test]
    fn test_assets_per_unit_share() {
        let ratio = ShareRatio::new(U256::from(3), U256::from(2));
        assert_eq!(
            ratio.assets_per_unit_share(),
            U256::from(1_500_000_000_000_000_000u64)
        );
    }
}

//! Point-in-time reads used as invariant inputs.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// An immutable record of one on-chain quantity at a given block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// What was read, e.g. `lp_balance(user1)` or `vault_shares_total`.
    pub label: String,
    pub value: U256,
    /// Block the read was taken at.
    pub block: u64,
}

impl Snapshot {
    pub fn new(label: impl Into<String>, value: U256, block: u64) -> Self {
        Self {
            label: label.into(),
            value,
            block,
        }
    }

    /// `later - self`, or `None` if the value shrank.
    pub fn increase_to(&self, later: &Snapshot) -> Option<U256> {
        later.value.checked_sub(self.value)
    }

    /// `self - later`, or `None` if the value grew.
    pub fn decrease_to(&self, later: &Snapshot) -> Option<U256> {
        self.value.checked_sub(later.value)
    }

    /// Number of blocks between two snapshots.
    pub fn blocks_until(&self, later: &Snapshot) -> u64 {
        later.block.saturating_sub(self.block)
    }
}

/// A before/after pair of reads of the same quantity around one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    pub before: Snapshot,
    pub after: Snapshot,
}

impl Delta {
    pub fn new(before: Snapshot, after: Snapshot) -> Self {
        Self { before, after }
    }

    /// Amount gained across the step, saturating at zero.
    pub fn gained(&self) -> U256 {
        self.before.increase_to(&self.after).unwrap_or(U256::ZERO)
    }

    /// Amount lost across the step, saturating at zero.
    pub fn lost(&self) -> U256 {
        self.before.decrease_to(&self.after).unwrap_or(U256::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increase_and_decrease() {
        let before = Snapshot::new("lp_balance", U256::from(100), 10);
        let after = Snapshot::new("lp_balance", U256::from(140), 12);

        assert_eq!(before.increase_to(&after), Some(U256::from(40)));
        assert_eq!(before.decrease_to(&after), None);
        assert_eq!(after.decrease_to(&before), Some(U256::from(40)));
        assert_eq!(before.blocks_until(&after), 2);
    }

    #[test]
    fn test_delta_saturates() {
        let delta = Delta::new(
            Snapshot::new("shares", U256::from(10), 1),
            Snapshot::new("shares", U256::from(4), 2),
        );
        assert_eq!(delta.gained(), U256::ZERO);
        assert_eq!(delta.lost(), U256::from(6));
    }
}

//! Per-vault compounding outcomes decoded from `earn` receipts.

use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionReceipt;
use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::prepared_call::decode_reason;
use crate::router::IVaultHealer;

/// What happened to one vault during a batched compounding call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EarnStatus {
    Compounded {
        want_locked_total: U256,
        total_supply: U256,
    },
    /// `FailedEarn(vid, reason)`.
    Failed { reason: String },
    /// `FailedEarnBytes(vid, data)`; `data` is raw revert data.
    FailedBytes { data: Bytes },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EarnOutcome {
    pub vid: U256,
    #[serde(flatten)]
    pub status: EarnStatus,
}

impl EarnOutcome {
    pub fn is_failure(&self) -> bool {
        !matches!(self.status, EarnStatus::Compounded { .. })
    }

    /// Human-readable failure reason, decoding `FailedEarnBytes` payloads
    /// when they hold an `Error(string)`.
    pub fn failure_reason(&self) -> Option<String> {
        match &self.status {
            EarnStatus::Compounded { .. } => None,
            EarnStatus::Failed { reason } => Some(reason.clone()),
            EarnStatus::FailedBytes { data } => {
                Some(decode_reason(data).unwrap_or_else(|| data.to_string()))
            }
        }
    }
}

/// Channel the router publishes earn outcomes on.
pub fn earn_channel() -> (UnboundedSender<EarnOutcome>, UnboundedReceiver<EarnOutcome>) {
    mpsc::unbounded_channel()
}

/// Decode `Earned`, `FailedEarn` and `FailedEarnBytes` logs emitted by
/// `router`, in log order.
pub fn decode_earn_outcomes(router: Address, receipt: &TransactionReceipt) -> Vec<EarnOutcome> {
    receipt
        .inner
        .logs()
        .iter()
        .filter(|log| log.address() == router)
        .filter_map(|log| {
            if let Ok(event) = log.log_decode::<IVaultHealer::Earned>() {
                let data = event.inner.data;
                return Some(EarnOutcome {
                    vid: data.vid,
                    status: EarnStatus::Compounded {
                        want_locked_total: data.wantLockedTotal,
                        total_supply: data.totalSupply,
                    },
                });
            }
            if let Ok(event) = log.log_decode::<IVaultHealer::FailedEarn>() {
                let data = event.inner.data;
                return Some(EarnOutcome {
                    vid: data.vid,
                    status: EarnStatus::Failed {
                        reason: data.reason,
                    },
                });
            }
            if let Ok(event) = log.log_decode::<IVaultHealer::FailedEarnBytes>() {
                let data = event.inner.data;
                return Some(EarnOutcome {
                    vid: data.vid,
                    status: EarnStatus::FailedBytes { data: data.reason },
                });
            }
            None
        })
        .collect()
}

/// Drain every outcome currently queued on `rx`.
pub fn drain(rx: &mut UnboundedReceiver<EarnOutcome>) -> Vec<EarnOutcome> {
    let mut outcomes = Vec::new();
    while let Ok(outcome) = rx.try_recv() {
        outcomes.push(outcome);
    }
    outcomes
}

//! Explicit state threaded from one scenario step to the next.

use alloy_primitives::{Address, U256};
use vault_harness_config::DeploymentConfig;
use vault_harness_contracts::{BoostPool, EarnOutcome, Strategy, VaultRouter};
use vault_harness_invariants::{InvariantChecker, PoolLedger, Snapshot};

use crate::error::{HarnessError, Result};
use crate::fixture::Impersonation;

/// Who sends a step's transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    /// The router owner: the deployer, or an impersonated on-chain owner.
    Admin,
    /// The n-th depositing identity.
    Depositor(usize),
}

/// Everything earlier steps produced that later steps consume.
///
/// Fields start empty and are filled as steps run; a step reading a field
/// no earlier step filled fails with [`HarnessError::MissingPrerequisite`].
pub struct ScenarioContext {
    pub deployment: DeploymentConfig,
    pub checker: InvariantChecker,
    /// Whether `checker` carries fee parameters read from the strategy.
    pub fees_live: bool,
    pub admin: Option<Address>,
    pub admin_impersonation: Option<Impersonation>,
    pub depositors: Vec<Address>,
    pub router: Option<VaultRouter>,
    pub strategy: Option<Strategy>,
    pub vid: Option<U256>,
    pub boost_id: Option<U256>,
    pub boost_pool: Option<BoostPool>,
    pub boost_enabled: bool,
    pub ledger: PoolLedger,
    pub snapshots: Vec<Snapshot>,
    pub earn_outcomes: Vec<EarnOutcome>,
}

impl ScenarioContext {
    pub fn new(deployment: DeploymentConfig, checker: InvariantChecker) -> Self {
        Self {
            deployment,
            checker,
            fees_live: false,
            admin: None,
            admin_impersonation: None,
            depositors: Vec::new(),
            router: None,
            strategy: None,
            vid: None,
            boost_id: None,
            boost_pool: None,
            boost_enabled: false,
            ledger: PoolLedger::default(),
            snapshots: Vec::new(),
            earn_outcomes: Vec::new(),
        }
    }

    pub fn actor(&self, step: &'static str, actor: Actor) -> Result<Address> {
        match actor {
            Actor::Admin => self.admin.ok_or(HarnessError::MissingPrerequisite {
                step,
                missing: "a router admin",
            }),
            Actor::Depositor(index) => {
                self.depositors
                    .get(index)
                    .copied()
                    .ok_or(HarnessError::MissingPrerequisite {
                        step,
                        missing: "a funded depositor",
                    })
            }
        }
    }

    pub fn router(&self, step: &'static str) -> Result<&VaultRouter> {
        self.router.as_ref().ok_or(HarnessError::MissingPrerequisite {
            step,
            missing: "a vault router",
        })
    }

    pub fn strategy(&self, step: &'static str) -> Result<&Strategy> {
        self.strategy.as_ref().ok_or(HarnessError::MissingPrerequisite {
            step,
            missing: "a registered strategy",
        })
    }

    pub fn vid(&self, step: &'static str) -> Result<U256> {
        self.vid.ok_or(HarnessError::MissingPrerequisite {
            step,
            missing: "a provisioned vault",
        })
    }

    pub fn boost(&self, step: &'static str) -> Result<(U256, &BoostPool)> {
        match (self.boost_id, self.boost_pool.as_ref()) {
            (Some(id), Some(pool)) => Ok((id, pool)),
            _ => Err(HarnessError::MissingPrerequisite {
                step,
                missing: "a boost pool",
            }),
        }
    }

    /// Keep a snapshot for the report and hand it back.
    pub fn record(&mut self, snapshot: Snapshot) -> Snapshot {
        self.snapshots.push(snapshot.clone());
        snapshot
    }
}

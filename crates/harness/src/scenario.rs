//! Scenario definitions: fixed, dependency-ordered step lists.

use serde::Serialize;
use vault_harness_config::{RouterKind, ScenarioParams};

use crate::context::Actor;

/// One action of a user journey, followed by its invariant checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Deploy (or bind) the router, deploy the strategy, register it and,
    /// on boosted routers with a boost configured, create the boost pool.
    ProvisionPool,
    /// Compare the registered strategy against the deployment config.
    VerifyRegistration,
    /// Fund every depositor and build their LP positions.
    ProvisionLiquidity,
    /// Deposit the depositor's whole LP balance.
    Deposit(Actor),
    /// Stake the depositor's vault shares in the boost pool.
    EnableBoost(Actor),
    /// Mine blocks and require the pending boost reward to grow.
    AccrueBoost(Actor),
    /// Claim boost rewards.
    HarvestBoost(Actor),
    /// Mine blocks, then compound the vault.
    Earn,
    /// Withdraw half of the depositor's position.
    PartialWithdraw(Actor),
    /// Withdraw everything using the max-uint sentinel.
    FullWithdraw(Actor),
    /// Require the depositor's vault and boost positions to be empty.
    AssertEmpty(Actor),
}

impl Step {
    /// Stable step name used in logs, violations and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ProvisionPool => "provision_pool",
            Self::VerifyRegistration => "verify_registration",
            Self::ProvisionLiquidity => "provision_liquidity",
            Self::Deposit(_) => "deposit",
            Self::EnableBoost(_) => "enable_boost",
            Self::AccrueBoost(_) => "accrue_boost",
            Self::HarvestBoost(_) => "harvest_boost",
            Self::Earn => "earn",
            Self::PartialWithdraw(_) => "partial_withdraw",
            Self::FullWithdraw(_) => "full_withdraw",
            Self::AssertEmpty(_) => "assert_empty",
        }
    }

    /// The identity issuing the step's transactions.
    pub fn actor(&self) -> Actor {
        match self {
            Self::ProvisionPool | Self::VerifyRegistration | Self::ProvisionLiquidity | Self::Earn => {
                Actor::Admin
            }
            Self::Deposit(actor)
            | Self::EnableBoost(actor)
            | Self::AccrueBoost(actor)
            | Self::HarvestBoost(actor)
            | Self::PartialWithdraw(actor)
            | Self::FullWithdraw(actor)
            | Self::AssertEmpty(actor) => *actor,
        }
    }

    /// Name plus depositor index, e.g. `deposit[1]`.
    pub fn label(&self) -> String {
        match self.actor() {
            Actor::Admin => self.name().to_string(),
            Actor::Depositor(index) => format!("{}[{}]", self.name(), index),
        }
    }
}

/// A named journey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub name: String,
    pub kind: RouterKind,
    pub steps: Vec<Step>,
}

/// Built-in journey selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Journey {
    Vaulting,
    Boosted,
}

impl Journey {
    pub fn kind(&self) -> RouterKind {
        match self {
            Self::Vaulting => RouterKind::Legacy,
            Self::Boosted => RouterKind::Boosted,
        }
    }

    pub fn for_kind(kind: RouterKind) -> Self {
        match kind {
            RouterKind::Legacy => Self::Vaulting,
            RouterKind::Boosted => Self::Boosted,
        }
    }
}

impl Scenario {
    /// Build a built-in journey for the given parameters.
    pub fn journey(journey: Journey, params: &ScenarioParams, with_boost: bool) -> Self {
        match journey {
            Journey::Vaulting => Self::vaulting(params),
            Journey::Boosted => Self::boosted(params, with_boost),
        }
    }

    /// Legacy router journey: register, deposit, compound, withdraw half,
    /// redeposit, withdraw all.
    pub fn vaulting(params: &ScenarioParams) -> Self {
        let first = Actor::Depositor(0);
        let mut steps = vec![
            Step::ProvisionPool,
            Step::VerifyRegistration,
            Step::ProvisionLiquidity,
            Step::Deposit(first),
            Step::Earn,
            Step::PartialWithdraw(first),
        ];
        steps.extend((1..params.depositors).map(|i| Step::Deposit(Actor::Depositor(i))));
        steps.extend([
            Step::Deposit(first),
            Step::FullWithdraw(first),
            Step::AssertEmpty(first),
        ]);

        Self {
            name: "vaulting".to_string(),
            kind: RouterKind::Legacy,
            steps,
        }
    }

    /// Boosted router journey. With a boost configured the first depositor
    /// also stakes, accrues and harvests boost rewards.
    pub fn boosted(params: &ScenarioParams, with_boost: bool) -> Self {
        let first = Actor::Depositor(0);
        let mut steps = vec![
            Step::ProvisionPool,
            Step::VerifyRegistration,
            Step::ProvisionLiquidity,
            Step::Deposit(first),
        ];
        if with_boost {
            steps.extend([
                Step::EnableBoost(first),
                Step::AccrueBoost(first),
                Step::HarvestBoost(first),
            ]);
        }
        steps.extend([Step::Earn, Step::PartialWithdraw(first)]);
        steps.extend((1..params.depositors).map(|i| Step::Deposit(Actor::Depositor(i))));
        steps.extend([
            Step::Deposit(first),
            Step::FullWithdraw(first),
            Step::AssertEmpty(first),
        ]);

        Self {
            name: "boosted".to_string(),
            kind: RouterKind::Boosted,
            steps,
        }
    }
}

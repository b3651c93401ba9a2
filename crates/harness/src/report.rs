//! Serializable run results.

use serde::Serialize;
use vault_harness_config::{DeploymentConfig, RouterKind};
use vault_harness_contracts::EarnOutcome;
use vault_harness_invariants::{FeeSchedule, InvariantViolation, PoolLedger, Snapshot};

use crate::error::{ErrorCategory, HarnessError};
use crate::scenario::Scenario;

/// How one step ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    Passed,
    /// An invariant check failed after the action succeeded.
    Violated { violation: InvariantViolation },
    /// The action itself failed.
    Failed {
        category: ErrorCategory,
        error: String,
    },
    /// Not run because an earlier step ended the scenario.
    Skipped,
}

impl StepStatus {
    pub fn from_error(err: &HarnessError) -> Self {
        match err {
            HarnessError::Invariant(violation) => Self::Violated {
                violation: violation.clone(),
            },
            other => Self::Failed {
                category: other.category(),
                error: other.to_string(),
            },
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: String,
    #[serde(flatten)]
    pub status: StepStatus,
    /// Block height after the step ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<u64>,
    pub duration_ms: u64,
}

/// Result of one scenario against one deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioReport {
    pub scenario: String,
    pub deployment: String,
    pub router_kind: RouterKind,
    /// Fee schedule the checks used.
    pub fees: FeeSchedule,
    /// Whether `fees` was read from the strategy.
    pub fees_live: bool,
    pub steps: Vec<StepReport>,
    pub ledger: PoolLedger,
    pub earn_outcomes: Vec<EarnOutcome>,
    pub snapshots: Vec<Snapshot>,
}

impl ScenarioReport {
    /// Report for a scenario that failed before its first step ran: the
    /// first step carries `err`, the rest are skipped.
    pub fn not_started(scenario: &Scenario, deployment: &DeploymentConfig, err: &HarnessError) -> Self {
        let mut labels = scenario.steps.iter().map(|step| step.label());
        let first = labels.next().unwrap_or_else(|| "start".to_string());

        let mut steps = vec![StepReport {
            step: first,
            status: StepStatus::from_error(err),
            block: None,
            duration_ms: 0,
        }];
        steps.extend(labels.map(|step| StepReport {
            step,
            status: StepStatus::Skipped,
            block: None,
            duration_ms: 0,
        }));

        Self {
            scenario: scenario.name.clone(),
            deployment: deployment.name.clone(),
            router_kind: deployment.router_kind,
            fees: deployment.fees.withdraw,
            fees_live: false,
            steps,
            ledger: PoolLedger::default(),
            earn_outcomes: Vec::new(),
            snapshots: Vec::new(),
        }
    }

    pub fn passed(&self) -> bool {
        self.steps.iter().all(|s| s.status.is_passed())
    }

    /// The step that ended the scenario, if any.
    pub fn first_failure(&self) -> Option<&StepReport> {
        self.steps
            .iter()
            .find(|s| !matches!(s.status, StepStatus::Passed | StepStatus::Skipped))
    }

    pub fn count(&self, predicate: impl Fn(&StepStatus) -> bool) -> usize {
        self.steps.iter().filter(|s| predicate(&s.status)).count()
    }
}

/// Results of every scenario in a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub scenarios: Vec<ScenarioReport>,
    /// Set when a sandbox failure stopped the run early.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,
}

impl RunReport {
    pub fn passed(&self) -> bool {
        self.aborted.is_none() && self.scenarios.iter().all(ScenarioReport::passed)
    }
}

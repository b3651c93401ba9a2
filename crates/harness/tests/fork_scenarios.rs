//! End-to-end journeys against a forked chain.
//!
//! Run with: `cargo test --test fork_scenarios -- --ignored`
//! Requires `ETH_RPC_URL` and `HARNESS_DEPLOYMENT` (path to a deployment
//! config whose artifacts exist on disk).


use fork_helpers::{deployment_from_env, spawn_forked};
use vault_harness::{Journey, Runner, RunnerConfig, Scenario, StepStatus};
use vault_harness_config::RouterKind;

#[tokio::test]
#[ignore = "Requires ETH_RPC_URL environment variable"]
async fn test_configured_journey_passes() {
    let Some(deployment) = deployment_from_env() else {
        return;
    };
    let Some(fixture) = spawn_forked().await else {
        return;
    };
    let journey = Journey::for_kind(deployment.router_kind);
    let scenario = Scenario::journey(journey, &deployment.scenario, deployment.has_boost());
    let mut runner = Runner::new(fixture, RunnerConfig::from_env());

    let report = runner.run(&deployment, &scenario).await.unwrap();

    for step in &report.steps {
        assert_eq!(step.status, StepStatus::Passed, "step {} did not pass", step.step);
    }
    assert!(report.ledger.deposited > alloy::primitives::U256::ZERO);
    assert!(!report.snapshots.is_empty());
    if deployment.router_kind == RouterKind::Boosted {
        assert!(report.earn_outcomes.iter().all(|o| !o.is_failure()));
    }
}

#[tokio::test]
#[ignore = "Requires ETH_RPC_URL environment variable"]
async fn test_owner_impersonation_released_between_runs() {
    let Some(deployment) = deployment_from_env() else {
        return;
    };
    let Some(fixture) = spawn_forked().await else {
        return;
    };
    let journey = Journey::for_kind(deployment.router_kind);
    let scenario = Scenario::journey(journey, &deployment.scenario, deployment.has_boost());
    let mut runner = Runner::new(fixture, RunnerConfig::from_env());

    let first = runner.run(&deployment, &scenario).await.unwrap();
    assert!(
        runner.fixture().impersonating().is_empty(),
        "still impersonating {:?}",
        runner.fixture().impersonating()
    );

    // The second run starts from a reset fork and impersonates the owner again.
    let second = runner.run(&deployment, &scenario).await.unwrap();
    assert!(runner.fixture().impersonating().is_empty());

    assert_eq!(first.passed(), second.passed());
    assert_eq!(first.steps.len(), second.steps.len());
}

//! Scenario execution on a forked sandbox.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::info;
use vault_harness::{Fixture, ForkSettings, RunReport, Runner, RunnerConfig, Scenario};
use vault_harness_config::DeploymentConfig;

use super::parse_base_units;
use crate::cli::{OutputFormat, RunArgs};
use crate::output::format_run_report;

fn runner_config(args: &RunArgs) -> Result<RunnerConfig> {
    let mut config = RunnerConfig::from_env().with_reset_between_scenarios(!args.no_reset);
    if let Some(epsilon) = &args.epsilon {
        config = config.with_epsilon(parse_base_units(epsilon)?);
    }
    if let Some(ms) = args.call_timeout_ms {
        config = config.with_call_timeout(Duration::from_millis(ms));
    }
    Ok(config)
}

fn fork_settings(args: &RunArgs) -> ForkSettings {
    // Rate-limit knobs still come from the environment.
    let mut settings =
        ForkSettings::from_env().unwrap_or_else(|_| ForkSettings::new(args.rpc_url.clone()));
    settings.rpc_url = args.rpc_url.clone();
    if let Some(block) = args.fork_block_number {
        settings = settings.with_block_number(block);
    }
    settings
}

/// Run the run command.
pub async fn run_scenarios(args: &RunArgs, format: OutputFormat) -> Result<()> {
    let jobs = args
        .configs
        .iter()
        .map(|path| {
            let deployment = DeploymentConfig::from_json_file(path)
                .with_context(|| format!("Invalid deployment config {}", path.display()))?;
            let journey = args.scenario.journey_for(deployment.router_kind);
            let scenario =
                Scenario::journey(journey, &deployment.scenario, deployment.has_boost());
            Ok((deployment, scenario))
        })
        .collect::<Result<Vec<_>>>()?;

    let config = runner_config(args)?;
    let fork = fork_settings(args);
    info!(block = ?fork.block_number, scenarios = jobs.len(), "starting sandbox");
    let fixture = Fixture::spawn(fork, &config)
        .await
        .context("Failed to start the forked sandbox")?;

    let mut runner = Runner::new(fixture, config);
    let report = runner.run_all(&jobs).await;

    match format {
        OutputFormat::Table => println!("{}", format_run_report(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if !report.passed() {
        bail!("{}", failure_summary(&report, jobs.len()));
    }
    Ok(())
}

/// Failed scenarios out of those that ran, plus any the abort left unstarted.
fn failure_summary(report: &RunReport, planned: usize) -> String {
    let started = report.scenarios.len();
    let failed = report.scenarios.iter().filter(|s| !s.passed()).count();
    let mut summary = format!("{failed} of {started} scenario(s) did not pass");
    let unstarted = planned.saturating_sub(started);
    if report.aborted.is_some() && unstarted > 0 {
        summary.push_str(&format!("; {unstarted} not started after the run aborted"));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use vault_harness::{ScenarioReport, StepReport, StepStatus};
    use vault_harness_config::RouterKind;
    use vault_harness_invariants::{FeeSchedule, PoolLedger};

    fn scenario(status: StepStatus) -> ScenarioReport {
        ScenarioReport {
            scenario: "vaulting".to_string(),
            deployment: "crystl-matic-usdc".to_string(),
            router_kind: RouterKind::Legacy,
            fees: FeeSchedule::default(),
            fees_live: false,
            steps: vec![StepReport {
                step: "provision_pool".to_string(),
                status,
                block: None,
                duration_ms: 0,
            }],
            ledger: PoolLedger::default(),
            earn_outcomes: Vec::new(),
            snapshots: Vec::new(),
        }
    }

    #[test]
    fn test_failure_summary_counts_unstarted_scenarios() {
        let report = RunReport {
            scenarios: vec![
                scenario(StepStatus::Passed),
                scenario(StepStatus::Failed {
                    category: vault_harness::ErrorCategory::Setup,
                    error: "Setup failed: anvil exited".to_string(),
                }),
            ],
            aborted: Some("provision_pool failed: Setup failed: anvil exited".to_string()),
        };

        assert_eq!(
            failure_summary(&report, 5),
            "1 of 2 scenario(s) did not pass; 3 not started after the run aborted"
        );
    }

    #[test]
    fn test_failure_summary_without_abort() {
        let report = RunReport {
            scenarios: vec![
                scenario(StepStatus::Passed),
                scenario(StepStatus::Failed {
                    category: vault_harness::ErrorCategory::Config,
                    error: "no code".to_string(),
                }),
            ],
            aborted: None,
        };

        assert_eq!(failure_summary(&report, 2), "1 of 2 scenario(s) did not pass");
    }

    #[test]
    fn test_failure_summary_abort_before_any_scenario() {
        let report = RunReport {
            scenarios: Vec::new(),
            aborted: Some("Setup failed: fork reset refused".to_string()),
        };

        assert_eq!(
            failure_summary(&report, 2),
            "0 of 0 scenario(s) did not pass; 2 not started after the run aborted"
        );
    }
}

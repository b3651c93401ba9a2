//! Scenario report formatting.

use colored::Colorize;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};
use vault_harness::{RunReport, ScenarioReport, StepStatus};
use vault_harness_config::{fee_percent, format_amount, DEFAULT_DECIMALS};

#[derive(Tabled)]
struct StepRow {
    #[tabled(rename = "Step")]
    step: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Block")]
    block: String,
    #[tabled(rename = "Time")]
    duration: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        let kept: String = text.chars().take(max_len - 3).collect();
        format!("{kept}...")
    } else {
        text.to_string()
    }
}

fn status_label(status: &StepStatus) -> &'static str {
    match status {
        StepStatus::Passed => "PASS",
        StepStatus::Violated { .. } => "VIOLATED",
        StepStatus::Failed { .. } => "FAILED",
        StepStatus::Skipped => "SKIPPED",
    }
}

fn status_detail(status: &StepStatus) -> String {
    match status {
        StepStatus::Passed | StepStatus::Skipped => "-".to_string(),
        StepStatus::Violated { violation } => truncate(&violation.to_string(), 80),
        StepStatus::Failed { category, error } => truncate(&format!("{category}: {error}"), 80),
    }
}

fn format_duration(ms: u64) -> String {
    if ms >= 1_000 {
        format!("{:.1}s", ms as f64 / 1_000.0)
    } else {
        format!("{ms}ms")
    }
}

pub fn format_scenario_report(report: &ScenarioReport) -> String {
    let mut output = String::new();

    let verdict = if report.passed() {
        "PASSED".green().bold()
    } else {
        "FAILED".red().bold()
    };
    output.push_str(&format!(
        "{} {} on {} ({} router)\n",
        verdict,
        report.scenario.bold(),
        report.deployment,
        report.router_kind
    ));
    output.push_str(&format!(
        "  Withdraw fee: {}% ({}, {})\n\n",
        fee_percent(&report.fees),
        report.fees,
        if report.fees_live { "live" } else { "configured" }
    ));

    let rows: Vec<StepRow> = report
        .steps
        .iter()
        .map(|s| StepRow {
            step: s.step.clone(),
            status: status_label(&s.status).to_string(),
            block: s.block.map_or_else(|| "-".to_string(), |b| b.to_string()),
            duration: format_duration(s.duration_ms),
            detail: status_detail(&s.status),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::left()));
    output.push_str(&table.to_string());
    output.push('\n');

    let ledger = &report.ledger;
    output.push_str(&format!("\n{}\n", "Ledger".cyan().bold()));
    output.push_str(&format!(
        "  Deposited:   {}\n",
        format_amount(ledger.deposited, DEFAULT_DECIMALS)
    ));
    output.push_str(&format!(
        "  Compounded:  {}\n",
        format_amount(ledger.compounded, DEFAULT_DECIMALS)
    ));
    output.push_str(&format!(
        "  Withdrawn:   {}\n",
        format_amount(ledger.withdrawn_net, DEFAULT_DECIMALS)
    ));
    output.push_str(&format!(
        "  Fees:        {}\n",
        format_amount(ledger.fees_paid, DEFAULT_DECIMALS)
    ));

    let failed_earns: Vec<_> = report
        .earn_outcomes
        .iter()
        .filter(|o| o.is_failure())
        .collect();
    if !failed_earns.is_empty() {
        output.push_str(&format!("\n{}\n", "Earn failures".yellow().bold()));
        for outcome in failed_earns {
            output.push_str(&format!(
                "  vault {}: {}\n",
                outcome.vid,
                outcome.failure_reason().unwrap_or_default()
            ));
        }
    }

    output
}

pub fn format_run_report(report: &RunReport) -> String {
    if report.scenarios.is_empty() && report.aborted.is_none() {
        return "No scenarios run.".to_string();
    }

    let mut output = report
        .scenarios
        .iter()
        .map(format_scenario_report)
        .collect::<Vec<_>>()
        .join("\n");

    let passed = report.scenarios.iter().filter(|s| s.passed()).count();
    let failed = report.scenarios.len() - passed;
    output.push_str(&format!(
        "\n{} passed, {} failed\n",
        passed.to_string().green(),
        if failed == 0 {
            failed.to_string().normal()
        } else {
            failed.to_string().red()
        }
    ));
    if let Some(reason) = &report.aborted {
        output.push_str(&format!("{} {}\n", "Run aborted:".red().bold(), reason));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use vault_harness::{ErrorCategory, StepReport};
    use vault_harness_config::RouterKind;
    use vault_harness_invariants::{FeeSchedule, PoolLedger};

    fn report(steps: Vec<StepReport>) -> ScenarioReport {
        ScenarioReport {
            scenario: "vaulting".to_string(),
            deployment: "crystl-matic-usdc".to_string(),
            router_kind: RouterKind::Legacy,
            fees: FeeSchedule::default(),
            fees_live: true,
            steps,
            ledger: PoolLedger {
                deposited: U256::from(10u64).pow(U256::from(18)),
                ..Default::default()
            },
            earn_outcomes: Vec::new(),
            snapshots: Vec::new(),
        }
    }

    fn step(name: &str, status: StepStatus) -> StepReport {
        StepReport {
            step: name.to_string(),
            status,
            block: Some(42),
            duration_ms: 1_500,
        }
    }

    #[test]
    fn test_format_scenario_report() {
        colored::control::set_override(false);
        let output = format_scenario_report(&report(vec![
            step("provision_pool", StepStatus::Passed),
            step(
                "deposit[0]",
                StepStatus::Failed {
                    category: ErrorCategory::Reverted,
                    error: "deposit reverted: paused".to_string(),
                },
            ),
            step("earn", StepStatus::Skipped),
        ]));

        assert!(output.contains("FAILED vaulting on crystl-matic-usdc (legacy router)"));
        assert!(output.contains("Withdraw fee: 0.1% (9990/10000, live)"));
        assert!(output.contains("reverted: deposit reverted: paused"));
        assert!(output.contains("SKIPPED"));
        assert!(output.contains("1.5s"));
        assert!(output.contains("Deposited:   1\n"));
    }

    #[test]
    fn test_format_run_report_aborted() {
        colored::control::set_override(false);
        let run = RunReport {
            scenarios: vec![report(vec![step("provision_pool", StepStatus::Passed)])],
            aborted: Some("provision_pool failed: Setup failed: anvil exited".to_string()),
        };

        let output = format_run_report(&run);
        assert!(output.contains("1 passed, 0 failed"));
        assert!(output.contains("Run aborted: provision_pool failed: Setup failed: anvil exited"));
    }

    #[test]
    fn test_format_empty_run() {
        assert_eq!(format_run_report(&RunReport::default()), "No scenarios run.");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long detail line", 10), "a very ...");
    }
}

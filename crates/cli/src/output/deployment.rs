//! Detailed output for a validated deployment config.

use colored::Colorize;
use vault_harness::Scenario;
use vault_harness_config::{
    fee_percent, format_amount, ContractSource, DeploymentConfig, DEFAULT_DECIMALS,
};

fn format_source(source: &ContractSource) -> String {
    match source {
        ContractSource::Existing { address } => format!("{address} (existing)"),
        ContractSource::Deploy { artifact, .. } => format!("deploy {}", artifact.display()),
    }
}

pub fn format_deployment_detail(config: &DeploymentConfig, scenario: &Scenario) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", "=".repeat(60)));
    output.push_str(&format!("{} {}\n", config.name.bold(), "is valid".green()));
    output.push_str(&format!("{}\n\n", "=".repeat(60)));

    output.push_str(&format!("{}\n", "Router".cyan().bold()));
    output.push_str(&format!("  Chain:       {}\n", config.chain));
    output.push_str(&format!("  Kind:        {}\n", config.router_kind));
    output.push_str(&format!("  Router:      {}\n", format_source(&config.vault_router)));
    output.push_str(&format!("  Strategy:    deploy {}\n\n", config.strategy.artifact.display()));

    output.push_str(&format!("{}\n", "Farm".cyan().bold()));
    output.push_str(&format!("  Masterchef:  {}\n", config.farm.masterchef));
    output.push_str(&format!("  Pid:         {}\n", config.farm.pid));
    output.push_str(&format!("  Want:        {}\n", config.want));
    output.push_str(&format!("  Earned:      {}\n", config.primary_earned()));
    output.push_str(&format!("  Swap router: {}\n\n", config.swap_router));

    output.push_str(&format!("{}\n", "Fees".cyan().bold()));
    output.push_str(&format!(
        "  Withdraw:    {}% ({})\n",
        fee_percent(&config.fees.withdraw),
        config.fees.withdraw
    ));
    output.push_str(&format!(
        "  Source:      {}\n",
        if config.fees.read_live {
            "strategy, falling back to config"
        } else {
            "config"
        }
    ));
    if let Some(recipient) = &config.fees.recipient {
        output.push_str(&format!("  Recipient:   {recipient}\n"));
    }
    output.push('\n');

    if let Some(boost) = &config.boost {
        output.push_str(&format!("{}\n", "Boost".cyan().bold()));
        output.push_str(&format!("  Pool:        deploy {}\n", boost.artifact.display()));
        output.push_str(&format!("  Reward:      {}\n", boost.reward_token));
        output.push_str(&format!(
            "  Funding:     {} native\n\n",
            format_amount(boost.reward_funding, DEFAULT_DECIMALS)
        ));
    }

    output.push_str(&format!("{}\n", "Scenario".cyan().bold()));
    output.push_str(&format!("  Journey:     {}\n", scenario.name));
    output.push_str(&format!("  Depositors:  {}\n", config.scenario.depositors));
    output.push_str(&format!(
        "  Swap value:  {} native per token\n",
        format_amount(config.funding.swap_value, DEFAULT_DECIMALS)
    ));
    output.push_str("  Steps:\n");
    for (i, step) in scenario.steps.iter().enumerate() {
        output.push_str(&format!("    {:>2}. {}\n", i + 1, step.label()));
    }

    output
}

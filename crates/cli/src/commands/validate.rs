//! Deployment config validation.

use anyhow::{Context, Result};
use vault_harness::{Journey, Scenario};
use vault_harness_config::DeploymentConfig;

use crate::cli::{OutputFormat, ValidateArgs};
use crate::output::format_deployment_detail;

/// Run the validate command.
pub fn run_validate(args: &ValidateArgs, format: OutputFormat) -> Result<()> {
    let config = DeploymentConfig::from_json_file(&args.config)
        .with_context(|| format!("Invalid deployment config {}", args.config.display()))?;

    match format {
        OutputFormat::Table => {
            let journey = Journey::for_kind(config.router_kind);
            let scenario = Scenario::journey(journey, &config.scenario, config.has_boost());
            println!("{}", format_deployment_detail(&config, &scenario));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

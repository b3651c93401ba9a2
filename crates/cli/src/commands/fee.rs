//! Offline fee computation.

use anyhow::{Context, Result};
use serde_json::json;
use vault_harness_invariants::FeeSchedule;

use super::parse_base_units;
use crate::cli::{FeeArgs, OutputFormat};
use crate::output::format_fee_table;

/// Run the fee command.
pub fn run_fee(args: &FeeArgs, format: OutputFormat) -> Result<()> {
    let schedule = FeeSchedule::new(args.factor, args.max).context("Invalid fee schedule")?;
    let gross = parse_base_units(&args.amount)?;

    match format {
        OutputFormat::Table => {
            println!("{}", format_fee_table(&schedule, gross, args.decimals));
        }
        OutputFormat::Json => {
            let value = json!({
                "schedule": schedule,
                "gross": gross,
                "fee": schedule.withdraw_fee(gross),
                "received": schedule.net_withdrawal(gross),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    Ok(())
}

//! Fee breakdown table.

use alloy_primitives::U256;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};
use vault_harness_config::{fee_percent, format_amount};
use vault_harness_invariants::FeeSchedule;

#[derive(Tabled)]
struct FeeRow {
    #[tabled(rename = "")]
    label: &'static str,
    #[tabled(rename = "Base units")]
    raw: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

pub fn format_fee_table(schedule: &FeeSchedule, gross: U256, decimals: u8) -> String {
    let fee = schedule.withdraw_fee(gross);
    let net = schedule.net_withdrawal(gross);

    let rows = vec![
        FeeRow {
            label: "Gross",
            raw: gross.to_string(),
            amount: format_amount(gross, decimals),
        },
        FeeRow {
            label: "Fee",
            raw: fee.to_string(),
            amount: format_amount(fee, decimals),
        },
        FeeRow {
            label: "Received",
            raw: net.to_string(),
            amount: format_amount(net, decimals),
        },
    ];

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()));

    format!(
        "Withdraw fee {}% ({})\n{}",
        fee_percent(schedule),
        schedule,
        table
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_table_at_fifty_tokens() {
        let gross = U256::from(50u64) * U256::from(10u64).pow(U256::from(18));
        let output = format_fee_table(&FeeSchedule::default(), gross, 18);

        assert!(output.starts_with("Withdraw fee 0.1% (9990/10000)"));
        assert!(output.contains("50000000000000000"));
        assert!(output.contains("49.95"));
        assert!(output.contains("0.05"));
    }

    #[test]
    fn test_fee_table_rounds_small_fees_to_zero() {
        let output = format_fee_table(&FeeSchedule::default(), U256::from(50u64), 0);
        let fee = output.lines().find(|l| l.contains("Fee ")).unwrap();
        let received = output.lines().find(|l| l.contains("Received")).unwrap();
        assert!(fee.contains(" 0 "), "{fee}");
        assert!(received.contains(" 50 "), "{received}");
    }
}

//! Human-readable amounts.
//!
//! Base-unit `U256` values are converted to [`Decimal`] for logs and
//! reports only. Invariant checks never go through this module.

use alloy_primitives::U256;
use rust_decimal::Decimal;
use vault_harness_invariants::FeeSchedule;

/// Decimals of the LP and reward tokens the harness handles.
pub const DEFAULT_DECIMALS: u8 = 18;

/// Convert a base-unit amount to a decimal with `decimals` fractional digits.
///
/// Returns `None` when the amount does not fit in a 96-bit mantissa or
/// `decimals` exceeds 28.
pub fn to_decimal(amount: U256, decimals: u8) -> Option<Decimal> {
    let raw = u128::try_from(amount).ok()?;
    let raw = i128::try_from(raw).ok()?;
    Decimal::try_from_i128_with_scale(raw, u32::from(decimals))
        .ok()
        .map(|d| d.normalize())
}

/// Format a base-unit amount, falling back to the raw integer when it does
/// not fit a decimal.
pub fn format_amount(amount: U256, decimals: u8) -> String {
    match to_decimal(amount, decimals) {
        Some(d) => d.to_string(),
        None => format!("{amount} (base units)"),
    }
}

/// Withdrawal fee as a percentage, e.g. `0.1` for `9990/10000`.
pub fn fee_percent(schedule: &FeeSchedule) -> Decimal {
    let numerator = Decimal::from(schedule.fee_numerator());
    let max = Decimal::from(schedule.max());
    (numerator * Decimal::ONE_HUNDRED / max).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_to_decimal_18_decimals() {
        let amount = U256::from(49_950_000_000_000_000_000u128);
        assert_eq!(to_decimal(amount, 18), Some(dec!(49.95)));
    }

    #[test]
    fn test_to_decimal_zero_decimals() {
        assert_eq!(to_decimal(U256::from(50), 0), Some(dec!(50)));
    }

    #[test]
    fn test_to_decimal_out_of_range() {
        assert_eq!(to_decimal(U256::MAX, 18), None);
        assert_eq!(to_decimal(U256::from(1), 29), None);
    }

    #[test]
    fn test_format_amount_fallback() {
        assert_eq!(format_amount(U256::from(1_500_000u64), 6), "1.5");
        assert!(format_amount(U256::MAX, 18).ends_with("(base units)"));
    }

    #[test]
    fn test_fee_percent() {
        assert_eq!(fee_percent(&FeeSchedule::default()), dec!(0.1));
        let schedule = FeeSchedule::new(9_500, 10_000).unwrap();
        assert_eq!(fee_percent(&schedule), dec!(5));
    }
}

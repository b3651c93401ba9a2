//! Integer helpers that reproduce on-chain rounding.
//!
//! Every helper here rounds the way Solidity's `uint256` arithmetic does:
//! division truncates toward zero. Floating point is never used.

use alloy_primitives::{U256, U512};

/// Default tolerance for comparisons that go through a share-to-asset
/// conversion (`1e15` base units, i.e. `0.001` of an 18-decimal token).
pub const DEFAULT_EPSILON: U256 = U256::from_limbs([1_000_000_000_000_000, 0, 0, 0]);

/// `floor(x * numerator / denominator)` without intermediate overflow,
/// provided `numerator <= denominator`.
///
/// Splits `x = q * denominator + r` so the product never exceeds `x`.
/// Returns `None` when `denominator` is zero or `numerator > denominator`.
pub fn mul_ratio_down(x: U256, numerator: U256, denominator: U256) -> Option<U256> {
    if denominator.is_zero() || numerator > denominator {
        return None;
    }
    let quotient = x / denominator;
    let remainder = x % denominator;
    Some(quotient * numerator + remainder * numerator / denominator)
}

/// `floor(x * y / denominator)` for share-to-asset conversions.
///
/// Returns `None` when `denominator` is zero or `x * y` overflows.
pub fn mul_div_down(x: U256, y: U256, denominator: U256) -> Option<U256> {
    if denominator.is_zero() {
        return None;
    }
    x.checked_mul(y).map(|product| product / denominator)
}

/// Absolute difference of two unsigned values.
pub fn abs_diff(a: U256, b: U256) -> U256 {
    if a >= b {
        a - b
    } else {
        b - a
    }
}

/// Whether `actual` lies within `epsilon` of `expected`, inclusive.
pub fn within_epsilon(expected: U256, actual: U256, epsilon: U256) -> bool {
    abs_diff(expected, actual) <= epsilon
}

/// `a * b` widened to 512 bits so ratio comparisons cannot overflow.
pub fn wide_mul(a: U256, b: U256) -> U512 {
    a.widening_mul(b)
}

/// `10^decimals` as a `U256`.
pub fn unit(decimals: u8) -> U256 {
    U256::from(10u64).pow(U256::from(decimals))
}

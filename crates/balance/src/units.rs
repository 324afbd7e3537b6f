//! Projections applied to a raw balance sample.

use alloy_primitives::{utils::format_units, U256};

/// Convert a base-unit amount into the chain's display unit.
///
/// `decimals` is the base-unit exponent of the native token (18 for ether).
pub fn to_display_units(amount: U256, decimals: u8) -> eyre::Result<f64> {
    let formatted = format_units(amount, decimals)?;
    let value = formatted.parse::<f64>()?;

    Ok(value)
}

/// Whether a balance is at or below the minimum threshold.
///
/// The comparison is closed: a balance exactly at the threshold counts as low.
pub fn is_low(amount: U256, min_balance: U256) -> bool {
    amount <= min_balance
}

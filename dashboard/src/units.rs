//! Native-unit conversion
//!
//! Raw balances arrive as smallest-unit integers (wei). Display values are
//! produced with integer arithmetic only:
//!
//! ```text
//! display = raw / 10^decimals, truncated to `places` fractional digits
//!
//! 1500000000000000000 wei → "1.500000" ETH
//! 1 wei                   → "0.000000" ETH
//! ```
//!
//! Truncation toward zero means a displayed balance never exceeds what
//! the account actually holds.

use crate::error::{DashboardError, Result};
use alloy_primitives::{Address, Uint};

/// Wide enough to hold any 256-bit quantity and 2^256 itself.
pub type RawAmount = Uint<512, 8>;

pub const ETHER_DECIMALS: u8 = 18;
pub const DISPLAY_PLACES: usize = 6;

/// Parse a smallest-unit integer given as decimal digits or a `0x` hex quantity.
pub fn parse_raw_amount(value: &str) -> Result<RawAmount> {
    let value = value.trim();
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) if !hex.is_empty() => RawAmount::from_str_radix(hex, 16),
        Some(_) => return Err(DashboardError::InvalidAmount(value.to_string())),
        None if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) => {
            RawAmount::from_str_radix(value, 10)
        }
        None => return Err(DashboardError::InvalidAmount(value.to_string())),
    };

    parsed.map_err(|e| DashboardError::InvalidAmount(format!("{}: {}", value, e)))
}

/// Format `raw / 10^decimals` with exactly `places` fractional digits, truncating.
pub fn format_units(raw: RawAmount, decimals: u8, places: usize) -> Result<String> {
    let unit = pow10(decimals as usize)?;
    let (whole, mut fraction) = raw.div_rem(unit);

    let decimals = decimals as usize;
    if places < decimals {
        fraction /= pow10(decimals - places)?;
    } else if places > decimals {
        fraction *= pow10(places - decimals)?;
    }

    if places == 0 {
        return Ok(whole.to_string());
    }

    Ok(format!(
        "{}.{:0>width$}",
        whole,
        fraction.to_string(),
        width = places
    ))
}

/// Convert a raw wei string into a 6-place ether string.
pub fn format_ether(raw: &str) -> Result<String> {
    format_units(parse_raw_amount(raw)?, ETHER_DECIMALS, DISPLAY_PLACES)
}

/// `0x` followed by 40 hex digits, any case.
pub fn is_valid_address(address: &str) -> bool {
    address.len() == 42
        && (address.starts_with("0x") || address.starts_with("0X"))
        && address[2..].parse::<Address>().is_ok()
}

fn pow10(exponent: usize) -> Result<RawAmount> {
    RawAmount::from(10u64)
        .checked_pow(RawAmount::from(exponent as u64))
        .ok_or_else(|| DashboardError::InvalidAmount(format!("10^{} overflows", exponent)))
}

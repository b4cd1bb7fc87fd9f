//! Conversion between human readable decimal strings and base-unit amounts.
//!
//! All arithmetic is done on arbitrary precision integers. Inputs that would lose precision
//! (more significant fractional digits than the asset has decimals) are rejected instead of
//! being truncated.

use num_bigint::BigUint;
use num_traits::Zero;

use super::{asset::MAX_DECIMALS, Amount};
use crate::HarnessError;

/// Parses a decimal string such as `"100"` or `"0.25"` into base units, i.e.
/// `value * 10^decimals`.
pub fn parse_units(value: &str, decimals: u32) -> Result<Amount, HarnessError> {
    let invalid = |reason: &str| HarnessError::InvalidAmount {
        value: value.to_string(),
        decimals,
        reason: reason.to_string(),
    };

    if decimals > MAX_DECIMALS {
        return Err(invalid("asset precision exceeds 255 decimals"));
    }

    let trimmed = value.trim();
    let (integer, fraction) = trimmed
        .split_once('.')
        .unwrap_or((trimmed, ""));

    if integer.is_empty() && fraction.is_empty() {
        return Err(invalid("empty amount"));
    }
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(integer) || !is_digits(fraction) {
        return Err(invalid("expected a non-negative decimal number"));
    }

    let precision = decimals as usize;
    let fraction = if fraction.len() > precision {
        let (kept, dropped) = fraction.split_at(precision);
        if dropped.bytes().any(|b| b != b'0') {
            return Err(invalid("more fractional digits than the asset precision"));
        }
        kept
    } else {
        fraction
    };

    let parse = |digits: &str| {
        if digits.is_empty() {
            Some(BigUint::zero())
        } else {
            BigUint::parse_bytes(digits.as_bytes(), 10)
        }
    };
    let integer = parse(integer).ok_or_else(|| invalid("not a base 10 number"))?;
    let fraction_units = parse(fraction).ok_or_else(|| invalid("not a base 10 number"))?;
    let ten = BigUint::from(10u32);

    Ok(integer * ten.pow(decimals) + fraction_units * ten.pow(decimals - fraction.len() as u32))
}

/// Formats a base-unit amount as a decimal string. Trailing fractional zeros are dropped, so
/// `format_units(parse_units("1.50", 18)?, 18)` yields `"1.5"`.
pub fn format_units(amount: &Amount, decimals: u32) -> String {
    let digits = amount.to_str_radix(10);
    let precision = decimals as usize;

    let (integer, fraction) = if digits.len() > precision {
        let (i, f) = digits.split_at(digits.len() - precision);
        (i.to_string(), f.to_string())
    } else {
        ("0".to_string(), "0".repeat(precision - digits.len()) + &digits)
    };

    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        integer
    } else {
        format!("{integer}.{fraction}")
    }
}

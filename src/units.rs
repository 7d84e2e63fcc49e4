//! Fixed-point conversions between decimal strings and scaled integers.

use alloy::primitives::utils::{format_units, parse_units, ParseUnits};
use alloy::primitives::U256;

use crate::blockchain::types::{ClaimError, ClaimResult};

/// Parse a positive decimal amount (e.g. `"1.5"`) into `decimals`-scaled units.
///
/// More fractional digits than the token carries is an error, never a
/// silent truncation.
pub fn parse_amount(amount: &str, decimals: u8) -> ClaimResult<U256> {
    let trimmed = amount.trim();
    if let Some((_, fraction)) = trimmed.split_once('.') {
        if fraction.len() > usize::from(decimals) {
            return Err(ClaimError::InvalidAmount(format!(
                "'{}' has more than {} decimal places",
                trimmed, decimals
            )));
        }
    }
    let value = match parse_units(trimmed, decimals) {
        Ok(ParseUnits::U256(value)) => value,
        Ok(ParseUnits::I256(_)) => {
            return Err(ClaimError::InvalidAmount(format!(
                "amount must be positive, got '{}'",
                trimmed
            )))
        }
        Err(e) => {
            return Err(ClaimError::InvalidAmount(format!(
                "'{}' is not a valid amount: {}",
                trimmed, e
            )))
        }
    };

    if value.is_zero() {
        return Err(ClaimError::InvalidAmount("amount must be greater than zero".to_string()));
    }
    Ok(value)
}

/// Render a scaled integer with exactly `decimals` fractional digits.
pub fn format_amount(raw: U256, decimals: u8) -> String {
    if decimals == 0 {
        return raw.to_string();
    }
    // Only fails for decimals above 77, which config validation rejects.
    format_units(raw, decimals).unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_and_fractional() {
        assert_eq!(parse_amount("100", 18).unwrap(), U256::from(100u64) * U256::from(10u64).pow(U256::from(18)));
        assert_eq!(parse_amount("1.5", 2).unwrap(), U256::from(150));
        assert_eq!(parse_amount(" 2 ", 0).unwrap(), U256::from(2));
    }

    #[test]
    fn test_parse_rejects_zero_negative_and_garbage() {
        assert!(matches!(parse_amount("0", 18), Err(ClaimError::InvalidAmount(_))));
        assert!(matches!(parse_amount("-1", 18), Err(ClaimError::InvalidAmount(_))));
        assert!(matches!(parse_amount("ten", 18), Err(ClaimError::InvalidAmount(_))));
    }

    #[test]
    fn test_parse_rejects_excess_precision() {
        assert!(matches!(parse_amount("1.239", 2), Err(ClaimError::InvalidAmount(_))));
        assert!(matches!(
            parse_amount("1.0000000000000000009", 18),
            Err(ClaimError::InvalidAmount(_))
        ));
        assert!(matches!(parse_amount("1.5", 0), Err(ClaimError::InvalidAmount(_))));
        assert_eq!(parse_amount("1.23", 2).unwrap(), U256::from(123));
        assert_eq!(parse_amount("1.000000000000000001", 18).unwrap(), U256::from(10u64).pow(U256::from(18)) + U256::from(1));
    }

    #[test]
    fn test_format_price_reconstructs_decimal() {
        assert_eq!(format_amount(U256::from(350_000_000_000u64), 8), "3500.00000000");
        assert_eq!(format_amount(U256::from(1u64), 8), "0.00000001");
        assert_eq!(format_amount(U256::from(42u64), 0), "42");
    }
}

/// Decimal scaling between human-readable amounts and on-chain integers
use ethers::types::U256;
use ethers::utils::{format_units, parse_units};
use ledgerline_common::{Error, Result};

/// Largest decimal count ethers can represent as a unit
pub const MAX_DECIMALS: u32 = 77;

/// Scale a decimal string such as `"12.5"` to an integer amount.
///
/// Rejects negative values and more fractional digits than `decimals`
/// instead of truncating them.
pub fn parse_amount(raw: &str, decimals: u32) -> Result<U256> {
    let amount = raw.trim().replace('_', "");
    if amount.is_empty() {
        return Err(Error::validation("amount is empty"));
    }
    if decimals > MAX_DECIMALS {
        return Err(Error::validation(format!("unsupported decimals: {}", decimals)));
    }

    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount.as_str(), ""),
    };
    let is_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(Error::validation(format!("'{}' is not a non-negative decimal amount", raw)));
    }
    if fraction.len() as u32 > decimals {
        return Err(Error::validation(format!(
            "'{}' has more than {} fractional digits",
            raw, decimals
        )));
    }

    let parsed = parse_units(amount.as_str(), decimals)
        .map_err(|e| Error::validation(format!("cannot scale '{}': {}", raw, e)))?;
    Ok(parsed.into())
}

/// Format an integer amount back to a trimmed decimal string (`"10"`, `"0.25"`)
pub fn format_amount(value: U256, decimals: u32) -> Result<String> {
    if decimals == 0 {
        return Ok(value.to_string());
    }
    let formatted = format_units(value, decimals)
        .map_err(|e| Error::validation(format!("cannot format amount {}: {}", value, e)))?;
    Ok(trim_fraction(&formatted))
}

fn trim_fraction(formatted: &str) -> String {
    match formatted.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                whole.to_string()
            } else {
                format!("{}.{}", whole, fraction)
            }
        }
        None => formatted.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_tokens_at_eighteen_decimals() {
        let scaled = parse_amount("10", 18).unwrap();
        assert_eq!(scaled, U256::from_dec_str("10000000000000000000").unwrap());
        assert_eq!(format_amount(scaled, 18).unwrap(), "10");
    }

    #[test]
    fn test_fractional_amounts() {
        assert_eq!(parse_amount("0.25", 18).unwrap(), U256::from(250_000_000_000_000_000u64));
        assert_eq!(parse_amount("1.5", 6).unwrap(), U256::from(1_500_000u64));
        assert_eq!(parse_amount(".5", 1).unwrap(), U256::from(5u64));
        assert_eq!(format_amount(U256::from(1_500_000u64), 6).unwrap(), "1.5");
        assert_eq!(format_amount(U256::from(1u64), 18).unwrap(), "0.000000000000000001");
        assert_eq!(format_amount(U256::zero(), 18).unwrap(), "0");
    }

    #[test]
    fn test_zero_decimals_is_identity() {
        assert_eq!(parse_amount("42", 0).unwrap(), U256::from(42u64));
        assert_eq!(format_amount(U256::from(42u64), 0).unwrap(), "42");
    }

    #[test]
    fn test_rejects_bad_amounts() {
        for raw in ["", " ", "-1", "abc", "1.2.3", "1e18", ".", "0x10"] {
            assert!(
                matches!(parse_amount(raw, 18), Err(Error::Validation(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_excess_precision() {
        let err = parse_amount("1.1234567", 6).unwrap_err();
        assert!(err.to_string().contains("more than 6 fractional digits"));
    }
}

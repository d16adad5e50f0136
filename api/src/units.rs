use alloy_primitives::U256;
use chrono::{DateTime, Utc};

use crate::error::ValidationError;

pub const ETHER_DECIMALS: u32 = 18;
pub const GWEI_DECIMALS: u32 = 9;

pub const WEI_PER_ETHER: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

fn scale(decimals: u32) -> U256 {
    U256::from(10u64).pow(U256::from(decimals))
}

/// Renders a base-unit amount with `decimals` fractional digits, trimming
/// trailing zeros.
pub fn format_units(value: U256, decimals: u32) -> String {
    let scale = scale(decimals);
    let whole = value / scale;
    let fraction = value % scale;
    if fraction.is_zero() {
        return whole.to_string();
    }
    let fraction = format!("{:0>width$}", fraction.to_string(), width = decimals as usize);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}

pub fn format_ether(wei: U256) -> String {
    format_units(wei, ETHER_DECIMALS)
}

/// Parses a decimal amount such as `"0.05"` into base units.
pub fn parse_units(input: &str, decimals: u32) -> Result<U256, ValidationError> {
    let invalid = || ValidationError::InvalidPrice(input.to_string());
    let input = input.trim();
    if input.is_empty() {
        return Err(invalid());
    }

    let (whole, fraction) = match input.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (input, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(whole) || !all_digits(fraction) || fraction.len() > decimals as usize {
        return Err(invalid());
    }

    let digits = |s: &str| -> Result<U256, ValidationError> {
        if s.is_empty() {
            Ok(U256::ZERO)
        } else {
            U256::from_str_radix(s, 10).map_err(|_| invalid())
        }
    };
    let padded = format!("{:0<width$}", fraction, width = decimals as usize);
    let whole = digits(whole)?;
    let fraction = digits(&padded)?;

    whole
        .checked_mul(scale(decimals))
        .and_then(|base| base.checked_add(fraction))
        .ok_or_else(invalid)
}

pub fn parse_ether(input: &str) -> Result<U256, ValidationError> {
    parse_units(input, ETHER_DECIMALS)
}

/// Shortened address for headers and cards, e.g. `0x12ab...9f3c`.
pub fn short_address(address: &str) -> String {
    if address.len() <= 12 {
        return address.to_string();
    }
    match (address.get(..6), address.get(address.len() - 4..)) {
        (Some(head), Some(tail)) => format!("{}...{}", head, tail),
        _ => address.to_string(),
    }
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_date_time(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wei(value: u128) -> U256 {
        U256::from(value)
    }

    #[test]
    fn formats_ether() {
        assert_eq!(format_ether(WEI_PER_ETHER), "1");
        assert_eq!(format_ether(U256::ZERO), "0");
        assert_eq!(format_ether(wei(1)), "0.000000000000000001");
        assert_eq!(format_ether(wei(1_500_000_000_000_000_000)), "1.5");
        assert_eq!(format_ether(wei(10_000_000_000_000_000)), "0.01");
        assert_eq!(format_ether(WEI_PER_ETHER * wei(25)), "25");
        assert_eq!(format_ether(wei(20_000_000_000_000_000_000)), "20");
    }

    #[test]
    fn formats_gwei() {
        assert_eq!(format_units(wei(1_000_000_000), GWEI_DECIMALS), "1");
        assert_eq!(format_units(wei(1_500), GWEI_DECIMALS), "0.0000015");
    }

    #[test]
    fn parses_ether() {
        assert_eq!(parse_ether("1").unwrap(), WEI_PER_ETHER);
        assert_eq!(parse_ether("0.05").unwrap(), wei(50_000_000_000_000_000));
        assert_eq!(parse_ether(".5").unwrap(), WEI_PER_ETHER / wei(2));
        assert_eq!(parse_ether("2.").unwrap(), WEI_PER_ETHER * wei(2));
        assert_eq!(parse_ether(" 0.000000000000000001 ").unwrap(), wei(1));
        assert_eq!(parse_units("1.5", GWEI_DECIMALS).unwrap(), wei(1_500_000_000));
        assert_eq!(
            parse_ether("999999999999999999999999").unwrap(),
            WEI_PER_ETHER * wei(999_999_999_999_999_999_999_999)
        );
    }

    #[test]
    fn rejects_bad_amounts() {
        for input in ["", ".", "-1", "1e18", "abc", "1.2.3", "0.0000000000000000001", "0x10"] {
            assert!(parse_ether(input).is_err(), "{input:?} should be rejected");
        }
        let too_big = "9".repeat(80);
        assert!(parse_ether(&too_big).is_err());
    }

    #[test]
    fn shortens_addresses() {
        assert_eq!(
            short_address("0x1234567890abcdef1234567890abcdef12345678"),
            "0x1234...5678"
        );
        assert_eq!(short_address("0x1234"), "0x1234");
    }
}

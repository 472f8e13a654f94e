//! Wei / ether conversions for display and user input

use crate::{Error, Result};
use alloy::primitives::utils::parse_ether;
use alloy::primitives::U256;

const ETHER_DECIMALS: u32 = 18;

/// Format a U256 value with decimals, trimming trailing zeros
pub fn format_units(value: U256, decimals: u32) -> String {
    if value.is_zero() {
        return "0".to_string();
    }

    let divisor = U256::from(10).pow(U256::from(decimals));
    let whole = value / divisor;
    let remainder = value % divisor;

    if remainder.is_zero() {
        return whole.to_string();
    }

    let remainder_str = format!("{:0>width$}", remainder, width = decimals as usize);
    let trimmed = remainder_str.trim_end_matches('0');
    format!("{}.{}", whole, trimmed)
}

/// Render wei as ether text, e.g. `50000000000000000` -> `0.05`
pub fn format_ether(wei: U256) -> String {
    format_units(wei, ETHER_DECIMALS)
}

/// Parse user supplied ether text into wei
pub fn ether_to_wei(amount: &str) -> Result<U256> {
    let amount = amount.trim();
    if amount.is_empty() || amount.starts_with('-') {
        return Err(Error::InvalidArgument(format!(
            "Invalid ETH amount: '{}'",
            amount
        )));
    }
    parse_ether(amount)
        .map_err(|e| Error::InvalidArgument(format!("Invalid ETH amount '{}': {}", amount, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_units() {
        let one_eth = U256::from(1_000_000_000_000_000_000u128);
        assert_eq!(format_ether(one_eth), "1");

        let five_hundredths = U256::from(50_000_000_000_000_000u128);
        assert_eq!(format_ether(five_hundredths), "0.05");

        let thousand_usdc = U256::from(1_000_000_000u64);
        assert_eq!(format_units(thousand_usdc, 6), "1000");

        assert_eq!(format_ether(U256::ZERO), "0");
    }

    #[test]
    fn test_ether_to_wei() {
        assert_eq!(
            ether_to_wei("0.05").unwrap(),
            U256::from(50_000_000_000_000_000u128)
        );
        assert_eq!(ether_to_wei("2").unwrap(), U256::from(2_000_000_000_000_000_000u128));
        assert!(ether_to_wei("").is_err());
        assert!(ether_to_wei("-1").is_err());
        assert!(ether_to_wei("abc").is_err());
    }
}

//! Investment calculator: how much ETH a USD amount buys at the current price.

use crate::error::{DashboardError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Preset USD amounts offered as shortcuts
pub const QUICK_AMOUNTS: [u32; 4] = [100, 500, 1000, 5000];

pub const ETH_AMOUNT_PLACES: u32 = 8;
pub const USD_PLACES: u32 = 2;

/// Result of a USD → ETH calculation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub usd: Decimal,
    pub eth: Decimal,
    pub price: Decimal,
}

impl Quote {
    pub fn summary(&self) -> String {
        format!(
            "You can buy {:.8} ETH for ${} at ${:.2} per ETH",
            self.eth, self.usd, self.price
        )
    }
}

/// Accepts what a USD input box may hold while typing: digits and at most one dot.
pub fn validate_usd_input(input: &str) -> bool {
    let mut seen_dot = false;
    for c in input.chars() {
        match c {
            '0'..='9' => {}
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    true
}

/// Parse a positive USD amount from user input
pub fn parse_usd(input: &str) -> Result<Decimal> {
    let input = input.trim();
    if input.is_empty() || !validate_usd_input(input) {
        return Err(DashboardError::InvalidAmount(input.to_string()));
    }

    // "5." and ".5" are fine while typing
    let normalized = match (input.starts_with('.'), input.ends_with('.')) {
        (true, _) => format!("0{}", input),
        (_, true) => input.trim_end_matches('.').to_string(),
        _ => input.to_string(),
    };

    let amount = Decimal::from_str(&normalized)
        .map_err(|e| DashboardError::InvalidAmount(format!("{}: {}", input, e)))?;

    if amount <= Decimal::ZERO {
        return Err(DashboardError::InvalidAmount(input.to_string()));
    }

    Ok(amount)
}

/// `usd / price`, rounded to 8 places. `None` if the price is not positive.
pub fn eth_for_usd(usd: Decimal, price: Decimal) -> Option<Decimal> {
    if price <= Decimal::ZERO {
        return None;
    }
    usd.checked_div(price)
        .map(|eth| eth.round_dp_with_strategy(ETH_AMOUNT_PLACES, RoundingStrategy::MidpointAwayFromZero))
}

/// Value of a native balance in USD, rounded to cents
pub fn balance_in_usd(balance: Decimal, price: Decimal) -> Option<Decimal> {
    balance
        .checked_mul(price)
        .map(|usd| usd.round_dp_with_strategy(USD_PLACES, RoundingStrategy::MidpointAwayFromZero))
}

/// Compute a quote from raw input and the latest price, if there is one
pub fn simulate(usd_input: &str, price: Option<Decimal>) -> Result<Quote> {
    let price = price.ok_or(DashboardError::PriceUnavailable)?;
    let usd = parse_usd(usd_input)?;
    let eth = eth_for_usd(usd, price).ok_or(DashboardError::PriceUnavailable)?;

    Ok(Quote { usd, eth, price })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_input_validation() {
        assert!(validate_usd_input(""));
        assert!(validate_usd_input("100"));
        assert!(validate_usd_input("100."));
        assert!(validate_usd_input(".5"));
        assert!(validate_usd_input("12.34"));
        assert!(!validate_usd_input("1.2.3"));
        assert!(!validate_usd_input("-5"));
        assert!(!validate_usd_input("1e3"));
        assert!(!validate_usd_input("$100"));
    }

    #[test]
    fn test_parse_usd() {
        assert_eq!(parse_usd("100").unwrap(), dec("100"));
        assert_eq!(parse_usd("5.").unwrap(), dec("5"));
        assert_eq!(parse_usd(".5").unwrap(), dec("0.5"));
        assert!(parse_usd("").is_err());
        assert!(parse_usd(".").is_err());
        assert!(parse_usd("0").is_err());
        assert!(parse_usd("abc").is_err());
    }

    #[test]
    fn test_eth_for_usd() {
        assert_eq!(eth_for_usd(dec("1000"), dec("2500")), Some(dec("0.4")));

        // 100 / 3 = 33.333333333... → 8 places
        assert_eq!(eth_for_usd(dec("100"), dec("3")), Some(dec("33.33333333")));

        // 2 / 3 = 0.6666666666... rounds up at the 8th place
        assert_eq!(eth_for_usd(dec("2"), dec("3")), Some(dec("0.66666667")));

        assert_eq!(eth_for_usd(dec("100"), Decimal::ZERO), None);
    }

    #[test]
    fn test_balance_in_usd() {
        assert_eq!(balance_in_usd(dec("1.5"), dec("3000")), Some(dec("4500.00")));
        assert_eq!(balance_in_usd(dec("0.123456"), dec("2000.5")), Some(dec("246.97")));
    }

    #[test]
    fn test_simulate() {
        let quote = simulate("500", Some(dec("2500"))).unwrap();
        assert_eq!(quote.eth, dec("0.2"));
        assert_eq!(
            quote.summary(),
            "You can buy 0.20000000 ETH for $500 at $2500.00 per ETH"
        );

        assert!(matches!(simulate("500", None), Err(DashboardError::PriceUnavailable)));
        assert!(matches!(simulate("", Some(dec("2500"))), Err(DashboardError::InvalidAmount(_))));
    }

    #[test]
    fn test_quick_amounts_are_valid_inputs() {
        for amount in QUICK_AMOUNTS {
            assert!(parse_usd(&amount.to_string()).is_ok());
        }
    }
}

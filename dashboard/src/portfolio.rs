use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Holding {
    pub symbol: &'static str,
    pub name: &'static str,
    pub amount: Decimal,
    pub value_usd: Decimal,
    pub change_percent_24h: Decimal,
    pub allocation_percent: u8,
}

/// Demo portfolio. Only the ETH line reflects real data (wallet balance × live price).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Portfolio {
    pub holdings: Vec<Holding>,
}

impl Portfolio {
    pub fn new(eth_balance: Option<Decimal>, eth_price: Option<Decimal>) -> Self {
        let eth_amount = eth_balance.unwrap_or(Decimal::ZERO);
        let eth_value = match (eth_balance, eth_price) {
            (Some(balance), Some(price)) => balance.checked_mul(price).unwrap_or(Decimal::ZERO),
            _ => Decimal::ZERO,
        };

        let holdings = vec![
            Holding {
                symbol: "ETH",
                name: "Ethereum",
                amount: eth_amount,
                value_usd: eth_value,
                change_percent_24h: Decimal::new(-123, 2),
                allocation_percent: 45,
            },
            Holding {
                symbol: "BTC",
                name: "Bitcoin",
                amount: Decimal::new(25, 3),
                value_usd: Decimal::new(108127, 2),
                change_percent_24h: Decimal::new(245, 2),
                allocation_percent: 35,
            },
            Holding {
                symbol: "ADA",
                name: "Cardano",
                amount: Decimal::from(1250),
                value_usd: Decimal::new(6125, 1),
                change_percent_24h: Decimal::new(367, 2),
                allocation_percent: 12,
            },
            Holding {
                symbol: "SOL",
                name: "Solana",
                amount: Decimal::new(25, 1),
                value_usd: Decimal::new(23945, 2),
                change_percent_24h: Decimal::new(523, 2),
                allocation_percent: 8,
            },
        ];

        Self { holdings }
    }

    pub fn holding(&self, symbol: &str) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.symbol == symbol)
    }

    pub fn total_value(&self) -> Decimal {
        self.holdings.iter().map(|h| h.value_usd).sum()
    }

    /// Mock 10.97% gain on the total value
    pub fn total_pnl(&self) -> Decimal {
        self.total_value() * Decimal::new(1097, 4)
    }
}

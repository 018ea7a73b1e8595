//! Dashboard
//!
//! Owns the wallet bridge and the latest price sample, and derives the
//! figures shown to the user: balance in USD, calculator quotes, and the
//! portfolio summary.
//!
//! ```text
//! PriceFeed ──price_sink()──► Dashboard ◄── WalletBridge
//!                                 │
//!                    summary() / quote()
//! ```

use crate::{
    calculator::{self, Quote},
    display,
    error::Result,
    portfolio::Portfolio,
    types::{PriceSample, WalletState},
    wallet_bridge::WalletBridge,
};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

pub struct Dashboard {
    wallet: WalletBridge,
    price: Arc<RwLock<Option<PriceSample>>>,
}

/// Snapshot of everything the dashboard displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub price: Option<PriceSample>,
    pub wallet: Option<WalletState>,
    pub balance_eth: Option<Decimal>,
    pub balance_usd: Option<Decimal>,
    pub portfolio: Portfolio,
}

impl Dashboard {
    pub fn new(wallet: WalletBridge) -> Self {
        Self {
            wallet,
            price: Arc::new(RwLock::new(None)),
        }
    }

    pub fn wallet(&self) -> &WalletBridge {
        &self.wallet
    }

    /// Callback for [`crate::price_feed::PriceFeed::start`]
    pub fn price_sink(&self) -> impl Fn(PriceSample) + Send + Sync + use<> {
        let price = self.price.clone();
        move |sample| {
            *price.write().unwrap_or_else(PoisonError::into_inner) = Some(sample);
        }
    }

    pub fn latest_price(&self) -> Option<PriceSample> {
        self.price
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// How much ETH `usd_input` buys at the latest price
    pub fn quote(&self, usd_input: &str) -> Result<Quote> {
        calculator::simulate(usd_input, self.latest_price().map(|p| p.value_usd))
    }

    pub fn summary(&self) -> DashboardSummary {
        let price = self.latest_price();
        let wallet = self.wallet.wallet();

        // Balances beyond Decimal range are shown without derived figures
        let balance_eth = wallet
            .as_ref()
            .and_then(|w| w.balance.as_deref())
            .and_then(|b| Decimal::from_str(b).ok());

        let eth_price = price.as_ref().map(|p| p.value_usd);
        let balance_usd = match (balance_eth, eth_price) {
            (Some(balance), Some(price)) => calculator::balance_in_usd(balance, price),
            _ => None,
        };

        DashboardSummary {
            portfolio: Portfolio::new(balance_eth, eth_price),
            price,
            wallet,
            balance_eth,
            balance_usd,
        }
    }
}

impl fmt::Display for DashboardSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.price {
            Some(price) => write!(
                f,
                "ETH {} ({})",
                display::format_usd(price.value_usd),
                display::format_change(price.change_percent_24h)
            )?,
            None => write!(f, "ETH price pending")?,
        }

        match &self.wallet {
            Some(wallet) => {
                let balance = wallet.balance.as_deref().unwrap_or("?");
                write!(f, " | {} {} ETH", display::short_address(&wallet.address), balance)?;
                if let Some(usd) = self.balance_usd {
                    write!(f, " ({})", display::format_usd(usd))?;
                }
            }
            None => write!(f, " | wallet disconnected")?,
        }

        write!(
            f,
            " | portfolio {} (P&L {})",
            display::format_usd(self.portfolio.total_value()),
            display::format_usd(self.portfolio.total_pnl())
        )
    }
}

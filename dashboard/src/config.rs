use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_PRICE_API_URL: &str = "https://api.coingecko.com/api/v3/simple/price?ids=ethereum&vs_currencies=usd&include_24hr_change=true&include_last_updated_at=true";

pub const DEFAULT_POLL_INTERVAL_SECONDS: u64 = 30;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Price endpoint (CoinGecko simple/price)
    pub price_api_url: String,

    /// Seconds between scheduled price fetches
    pub poll_interval_seconds: u64,

    /// Ethereum JSON-RPC endpoint backing the wallet provider.
    /// `None` means no provider is available.
    pub eth_rpc_url: Option<String>,

    /// Request account access on startup instead of only checking
    /// already-authorized accounts
    pub wallet_auto_connect: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            price_api_url: DEFAULT_PRICE_API_URL.to_string(),
            poll_interval_seconds: DEFAULT_POLL_INTERVAL_SECONDS,
            eth_rpc_url: None,
            wallet_auto_connect: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Config {
            price_api_url: std::env::var("PRICE_API_URL")
                .unwrap_or_else(|_| DEFAULT_PRICE_API_URL.to_string()),
            poll_interval_seconds: std::env::var("PRICE_POLL_INTERVAL_SECONDS")
                .unwrap_or_else(|_| DEFAULT_POLL_INTERVAL_SECONDS.to_string())
                .parse()?,
            eth_rpc_url: std::env::var("ETH_RPC_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            wallet_auto_connect: std::env::var("WALLET_AUTO_CONNECT")
                .unwrap_or_else(|_| "false".to_string())
                .parse()?,
        };

        if config.poll_interval_seconds == 0 {
            anyhow::bail!("PRICE_POLL_INTERVAL_SECONDS must be greater than zero");
        }

        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }
}

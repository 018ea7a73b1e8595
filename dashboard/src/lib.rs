pub mod calculator;
pub mod coingecko_client;
pub mod config;
pub mod dashboard;
pub mod display;
pub mod error;
pub mod notify;
pub mod portfolio;
pub mod price_feed;
pub mod provider;
pub mod types;
pub mod units;
pub mod wallet_bridge;

pub use dashboard::{Dashboard, DashboardSummary};
pub use error::{DashboardError, ErrorKind, Result};
pub use price_feed::{FeedHandle, PriceFeed, PriceSource};
pub use provider::ChainProvider;
pub use types::{Notification, PriceSample, Severity, WalletState, WalletStatus};
pub use wallet_bridge::WalletBridge;

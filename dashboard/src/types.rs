use serde::{Deserialize, Serialize};
use rust_decimal::Decimal;

/// A single point-in-time ETH/USD observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSample {
    /// Price in USD, exactly as reported by the source up to 28 significant
    /// digits (the precision of `Decimal`). Longer values are rounded.
    pub value_usd: Decimal,

    /// 24h change in percent
    pub change_percent_24h: Decimal,

    /// Unix timestamp of the observation
    pub observed_at_epoch_seconds: i64,
}

/// The currently connected account and its converted balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletState {
    /// Hex address as reported by the provider (case-insensitive)
    pub address: String,

    /// Native balance with 6 decimal places, `None` if the balance query failed
    pub balance: Option<String>,
}

/// Wallet connection lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WalletStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected(WalletState),
}

impl WalletStatus {
    pub fn wallet(&self) -> Option<&WalletState> {
        match self {
            WalletStatus::Connected(state) => Some(state),
            _ => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, WalletStatus::Connected(_))
    }
}

/// One-shot user-facing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Error,
}

impl Notification {
    pub fn info(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            severity: Severity::Info,
        }
    }

    pub fn error(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            severity: Severity::Error,
        }
    }
}

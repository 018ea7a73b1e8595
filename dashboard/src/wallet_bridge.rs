//! Wallet Bridge
//!
//! Connects to a chain provider, picks the active account and reads its
//! native balance.
//!
//! # States
//! ```text
//!                connect()              account + balance
//! Disconnected ────────────► Connecting ──────────────────► Connected
//!      ▲                         │                              │
//!      └──── failure (notify) ───┘                              │
//!      └─────────────────────── disconnect() ───────────────────┘
//! ```
//!
//! A failed balance query does not fail the connection: the account is
//! reported as connected with no balance. Status changes are published on a
//! watch channel so owners can render `Connecting`.
//!
//! A `disconnect()` while `Connecting` wins: the pending result is dropped
//! when it arrives.

use crate::{
    error::{DashboardError, Result},
    notify::Notifier,
    provider::ChainProvider,
    types::{Notification, WalletState, WalletStatus},
    units,
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

pub struct WalletBridge {
    provider: Option<Arc<dyn ChainProvider>>,
    notifier: Arc<dyn Notifier>,
    status: watch::Sender<WalletStatus>,
}

impl WalletBridge {
    /// `provider` is `None` when no chain provider is available.
    pub fn new(provider: Option<Arc<dyn ChainProvider>>, notifier: Arc<dyn Notifier>) -> Self {
        let (status, _) = watch::channel(WalletStatus::Disconnected);
        Self {
            provider,
            notifier,
            status,
        }
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub fn status(&self) -> WalletStatus {
        self.status.borrow().clone()
    }

    pub fn wallet(&self) -> Option<WalletState> {
        self.status.borrow().wallet().cloned()
    }

    pub fn subscribe(&self) -> watch::Receiver<WalletStatus> {
        self.status.subscribe()
    }

    /// Request account access and load the first account with its balance.
    ///
    /// # Errors
    /// * `ProviderUnavailable` - No provider; state is left untouched
    /// * `ConnectInProgress` - Another connect has not finished yet
    /// * `ConnectCancelled` - The wallet was disconnected before the provider answered
    /// * anything the provider returns while requesting accounts
    pub async fn connect(&self) -> Result<WalletState> {
        let Some(provider) = self.provider.clone() else {
            warn!("Wallet connect requested but no provider is available");
            self.notifier.notify(Notification::error(
                "Wallet provider not found",
                "Please install a wallet provider to connect your wallet.",
            ));
            return Err(DashboardError::ProviderUnavailable);
        };

        self.begin_connecting()?;

        let result = match provider.request_accounts().await {
            Ok(accounts) => load_account(provider.as_ref(), accounts).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(state) => {
                if !self.finish_connecting(WalletStatus::Connected(state.clone())) {
                    debug!("Discarding connection to {}: disconnected while connecting", state.address);
                    return Err(DashboardError::ConnectCancelled);
                }
                info!("Wallet connected: {}", state.address);
                self.notifier.notify(Notification::info(
                    "Wallet connected!",
                    "Successfully connected to your wallet.",
                ));
                Ok(state)
            }
            Err(e) => {
                self.finish_connecting(WalletStatus::Disconnected);
                error!("Error connecting wallet: {}", e);
                self.notifier.notify(Notification::error(
                    "Connection failed",
                    "Failed to connect to your wallet.",
                ));
                Err(e)
            }
        }
    }

    /// Pick up an already-authorized account without prompting.
    ///
    /// Returns `Ok(None)` when there is no provider, nothing is authorized, or
    /// the wallet was disconnected before the account finished loading.
    /// Failures are logged, never notified.
    pub async fn reconnect(&self) -> Result<Option<WalletState>> {
        let Some(provider) = self.provider.clone() else {
            debug!("No provider, skipping wallet reconnect");
            return Ok(None);
        };

        let accounts = provider.authorized_accounts().await.map_err(|e| {
            warn!("Error checking wallet connection: {}", e);
            e
        })?;

        if accounts.is_empty() {
            debug!("No previously authorized accounts");
            return Ok(None);
        }

        self.begin_connecting()?;

        match load_account(provider.as_ref(), accounts).await {
            Ok(state) => {
                if !self.finish_connecting(WalletStatus::Connected(state.clone())) {
                    debug!("Discarding reconnection to {}: disconnected while connecting", state.address);
                    return Ok(None);
                }
                info!("Wallet reconnected: {}", state.address);
                Ok(Some(state))
            }
            Err(e) => {
                self.finish_connecting(WalletStatus::Disconnected);
                warn!("Error restoring wallet connection: {}", e);
                Err(e)
            }
        }
    }

    /// Re-read the balance of the connected account.
    ///
    /// On failure the current state is kept as is.
    pub async fn refresh_balance(&self) -> Result<WalletState> {
        let provider = self.provider.clone().ok_or(DashboardError::ProviderUnavailable)?;
        let address = self.wallet().ok_or(DashboardError::NotConnected)?.address;

        let balance = query_balance(provider.as_ref(), &address).await?;
        let refreshed = WalletState {
            address: address.clone(),
            balance: Some(balance),
        };

        // The user may have disconnected or switched accounts meanwhile
        let applied = self.status.send_if_modified(|status| {
            let unchanged = matches!(
                status,
                WalletStatus::Connected(current) if current.address == address
            );
            if unchanged {
                *status = WalletStatus::Connected(refreshed.clone());
            }
            unchanged
        });

        if !applied {
            debug!("Discarding balance for {}: wallet changed", address);
            return Err(DashboardError::NotConnected);
        }

        Ok(refreshed)
    }

    /// Forget the connected account. Does not revoke provider authorization.
    pub fn disconnect(&self) {
        let changed = self.status.send_if_modified(|status| {
            if *status == WalletStatus::Disconnected {
                return false;
            }
            *status = WalletStatus::Disconnected;
            true
        });

        if changed {
            info!("Wallet disconnected");
        }
    }

    fn begin_connecting(&self) -> Result<()> {
        let started = self.status.send_if_modified(|status| {
            if *status == WalletStatus::Connecting {
                return false;
            }
            *status = WalletStatus::Connecting;
            true
        });

        if started {
            Ok(())
        } else {
            warn!("Wallet connection already in progress");
            Err(DashboardError::ConnectInProgress)
        }
    }

    /// Leave `Connecting` for `next`. Returns false if a disconnect got there first.
    fn finish_connecting(&self, next: WalletStatus) -> bool {
        self.status.send_if_modified(|status| {
            if *status != WalletStatus::Connecting {
                return false;
            }
            *status = next;
            true
        })
    }
}

/// First account becomes the active address; its balance is best-effort.
async fn load_account(provider: &dyn ChainProvider, accounts: Vec<String>) -> Result<WalletState> {
    let address = accounts
        .into_iter()
        .next()
        .ok_or(DashboardError::NoAccounts)?;

    if !units::is_valid_address(&address) {
        return Err(DashboardError::InvalidAddress(address));
    }

    let balance = match query_balance(provider, &address).await {
        Ok(balance) => Some(balance),
        Err(e) => {
            warn!("Error getting balance for {}: {}", address, e);
            None
        }
    };

    Ok(WalletState { address, balance })
}

/// Raw balance from the provider, formatted as 6-place ether
pub async fn query_balance(provider: &dyn ChainProvider, address: &str) -> Result<String> {
    let raw = provider.get_balance(address).await?;
    let balance = units::format_ether(&raw)?;
    debug!("Balance of {}: {} ETH (raw {})", address, balance, raw);
    Ok(balance)
}

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use eth_dashboard::{
    ChainProvider, DashboardError, ErrorKind, Notification, Result, Severity, WalletBridge,
    WalletStatus, notify::Notifier,
};
use tokio::sync::Notify;

const ADDRESS: &str = "0x52908400098527886E0F7030069857D2E4169EE7";
const OTHER_ADDRESS: &str = "0xde709f2102306220921060314715629080e2fb77";

#[derive(Default)]
struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    fn seen(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

/// Provider whose answers are set per test. `None` means the call fails.
#[derive(Default)]
struct ScriptedProvider {
    requested: Mutex<Option<Vec<String>>>,
    authorized: Mutex<Option<Vec<String>>>,
    balance: Mutex<Option<String>>,
    request_gate: Option<Arc<Notify>>,
    balance_gate: Option<Arc<Notify>>,
    request_calls: AtomicUsize,
    balance_calls: AtomicUsize,
}

impl ScriptedProvider {
    fn with_account(balance: Option<&str>) -> Self {
        Self {
            requested: Mutex::new(Some(vec![ADDRESS.to_string(), OTHER_ADDRESS.to_string()])),
            authorized: Mutex::new(Some(vec![])),
            balance: Mutex::new(balance.map(str::to_string)),
            ..Default::default()
        }
    }

    fn set_balance(&self, balance: Option<&str>) {
        *self.balance.lock().unwrap() = balance.map(str::to_string);
    }
}

#[async_trait]
impl ChainProvider for ScriptedProvider {
    async fn request_accounts(&self) -> Result<Vec<String>> {
        self.request_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.request_gate {
            gate.notified().await;
        }
        self.requested
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| DashboardError::Rpc { code: 4001, message: "User rejected the request.".to_string() })
    }

    async fn authorized_accounts(&self) -> Result<Vec<String>> {
        self.authorized
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| DashboardError::Provider("eth_accounts failed".to_string()))
    }

    async fn get_balance(&self, _address: &str) -> Result<String> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.balance_gate {
            gate.notified().await;
        }
        self.balance
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| DashboardError::Provider("eth_getBalance failed".to_string()))
    }
}

fn bridge(provider: Option<Arc<ScriptedProvider>>) -> (WalletBridge, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let provider = provider.map(|p| p as Arc<dyn ChainProvider>);
    (WalletBridge::new(provider, notifier.clone()), notifier)
}

#[tokio::test]
async fn test_connect_without_provider_is_unavailable() {
    let (wallet, notifier) = bridge(None);
    let mut status = wallet.subscribe();

    let err = wallet.connect().await.unwrap_err();

    assert!(matches!(err, DashboardError::ProviderUnavailable));
    assert_eq!(err.kind(), ErrorKind::Unavailable);
    assert_eq!(wallet.status(), WalletStatus::Disconnected);
    assert!(!status.has_changed().unwrap());

    let seen = notifier.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].severity, Severity::Error);
}

#[tokio::test]
async fn test_connect_takes_first_account_and_balance() {
    let provider = Arc::new(ScriptedProvider::with_account(Some("1500000000000000000")));
    let (wallet, notifier) = bridge(Some(provider.clone()));

    let state = wallet.connect().await.unwrap();

    assert_eq!(state.address, ADDRESS);
    assert_eq!(state.balance.as_deref(), Some("1.500000"));
    assert_eq!(wallet.status(), WalletStatus::Connected(state));
    assert_eq!(provider.request_calls.load(Ordering::SeqCst), 1);

    let seen = notifier.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].title, "Wallet connected!");
    assert_eq!(seen[0].severity, Severity::Info);
}

#[tokio::test]
async fn test_connect_with_failed_balance_keeps_address() {
    let provider = Arc::new(ScriptedProvider::with_account(None));
    let (wallet, _notifier) = bridge(Some(provider.clone()));

    let state = wallet.connect().await.unwrap();

    assert_eq!(state.address, ADDRESS);
    assert_eq!(state.balance, None);
    assert!(wallet.status().is_connected());
    assert_eq!(provider.balance_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_connect_rejected_returns_to_disconnected() {
    let provider = Arc::new(ScriptedProvider {
        requested: Mutex::new(None),
        ..Default::default()
    });
    let (wallet, notifier) = bridge(Some(provider));

    let err = wallet.connect().await.unwrap_err();

    assert!(matches!(err, DashboardError::Rpc { code: 4001, .. }));
    assert_eq!(err.kind(), ErrorKind::Transient);
    assert_eq!(wallet.status(), WalletStatus::Disconnected);

    let seen = notifier.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].title, "Connection failed");
    assert_eq!(seen[0].severity, Severity::Error);
}

#[tokio::test]
async fn test_connect_with_no_accounts_fails() {
    let provider = Arc::new(ScriptedProvider {
        requested: Mutex::new(Some(vec![])),
        ..Default::default()
    });
    let (wallet, _notifier) = bridge(Some(provider));

    assert!(matches!(wallet.connect().await, Err(DashboardError::NoAccounts)));
    assert_eq!(wallet.status(), WalletStatus::Disconnected);
}

#[tokio::test]
async fn test_connect_rejects_malformed_address() {
    let provider = Arc::new(ScriptedProvider {
        requested: Mutex::new(Some(vec!["not-an-address".to_string()])),
        balance: Mutex::new(Some("1".to_string())),
        ..Default::default()
    });
    let (wallet, _notifier) = bridge(Some(provider));

    assert!(matches!(wallet.connect().await, Err(DashboardError::InvalidAddress(_))));
    assert_eq!(wallet.status(), WalletStatus::Disconnected);
}

#[tokio::test]
async fn test_disconnect_clears_state_idempotently() {
    let provider = Arc::new(ScriptedProvider::with_account(Some("1000000000000000000")));
    let (wallet, _notifier) = bridge(Some(provider));
    let mut status = wallet.subscribe();

    wallet.connect().await.unwrap();
    status.borrow_and_update();

    wallet.disconnect();
    assert_eq!(wallet.status(), WalletStatus::Disconnected);
    assert!(wallet.wallet().is_none());
    assert!(status.has_changed().unwrap());
    status.borrow_and_update();

    wallet.disconnect();
    assert_eq!(wallet.status(), WalletStatus::Disconnected);
    assert!(!status.has_changed().unwrap());
}

#[tokio::test]
async fn test_reconnect_uses_authorized_accounts_silently() {
    let provider = Arc::new(ScriptedProvider {
        authorized: Mutex::new(Some(vec![OTHER_ADDRESS.to_string()])),
        balance: Mutex::new(Some("0x1bc16d674ec80000".to_string())),
        ..Default::default()
    });
    let (wallet, notifier) = bridge(Some(provider.clone()));

    let state = wallet.reconnect().await.unwrap().unwrap();

    assert_eq!(state.address, OTHER_ADDRESS);
    assert_eq!(state.balance.as_deref(), Some("2.000000"));
    assert!(wallet.status().is_connected());
    assert_eq!(provider.request_calls.load(Ordering::SeqCst), 0);
    assert!(notifier.seen().is_empty());
}

#[tokio::test]
async fn test_reconnect_without_authorization_is_noop() {
    let provider = Arc::new(ScriptedProvider::with_account(Some("1")));
    let (wallet, notifier) = bridge(Some(provider.clone()));

    assert_eq!(wallet.reconnect().await.unwrap(), None);
    assert_eq!(wallet.status(), WalletStatus::Disconnected);
    assert_eq!(provider.balance_calls.load(Ordering::SeqCst), 0);

    let (no_provider, _) = bridge(None);
    assert_eq!(no_provider.reconnect().await.unwrap(), None);

    let failing = Arc::new(ScriptedProvider {
        authorized: Mutex::new(None),
        ..Default::default()
    });
    let (wallet, _) = bridge(Some(failing));
    assert!(wallet.reconnect().await.is_err());
    assert_eq!(wallet.status(), WalletStatus::Disconnected);

    assert!(notifier.seen().is_empty());
}

#[tokio::test]
async fn test_connecting_state_is_visible_and_exclusive() {
    let gate = Arc::new(Notify::new());
    let provider = Arc::new(ScriptedProvider {
        request_gate: Some(gate.clone()),
        ..ScriptedProvider::with_account(Some("1500000000000000000"))
    });
    let (wallet, _notifier) = bridge(Some(provider));
    let wallet = Arc::new(wallet);
    let mut status = wallet.subscribe();

    let pending = tokio::spawn({
        let wallet = wallet.clone();
        async move { wallet.connect().await }
    });

    status.changed().await.unwrap();
    assert_eq!(*status.borrow_and_update(), WalletStatus::Connecting);

    assert!(matches!(wallet.connect().await, Err(DashboardError::ConnectInProgress)));
    assert_eq!(wallet.status(), WalletStatus::Connecting);

    gate.notify_one();
    let state = tokio::time::timeout(Duration::from_secs(5), pending)
        .await
        .unwrap()
        .unwrap()
        .unwrap();

    assert_eq!(wallet.status(), WalletStatus::Connected(state));
}

#[tokio::test]
async fn test_disconnect_while_connecting_wins() {
    let gate = Arc::new(Notify::new());
    let provider = Arc::new(ScriptedProvider {
        request_gate: Some(gate.clone()),
        ..ScriptedProvider::with_account(Some("1500000000000000000"))
    });
    let (wallet, notifier) = bridge(Some(provider));
    let wallet = Arc::new(wallet);
    let mut status = wallet.subscribe();

    let pending = tokio::spawn({
        let wallet = wallet.clone();
        async move { wallet.connect().await }
    });

    status.changed().await.unwrap();
    assert_eq!(*status.borrow_and_update(), WalletStatus::Connecting);

    wallet.disconnect();
    assert_eq!(wallet.status(), WalletStatus::Disconnected);
    status.borrow_and_update();

    gate.notify_one();
    let result = tokio::time::timeout(Duration::from_secs(5), pending)
        .await
        .unwrap()
        .unwrap();

    assert!(matches!(result, Err(DashboardError::ConnectCancelled)));
    assert_eq!(wallet.status(), WalletStatus::Disconnected);
    assert!(wallet.wallet().is_none());
    assert!(!status.has_changed().unwrap());
    assert!(notifier.seen().is_empty());

    // The bridge is usable again afterwards
    gate.notify_one();
    assert!(wallet.connect().await.unwrap().balance.is_some());
}

#[tokio::test]
async fn test_disconnect_while_reconnecting_wins() {
    let gate = Arc::new(Notify::new());
    let provider = Arc::new(ScriptedProvider {
        authorized: Mutex::new(Some(vec![ADDRESS.to_string()])),
        balance: Mutex::new(Some("1000000000000000000".to_string())),
        balance_gate: Some(gate.clone()),
        ..Default::default()
    });
    let (wallet, _notifier) = bridge(Some(provider));
    let wallet = Arc::new(wallet);
    let mut status = wallet.subscribe();

    let pending = tokio::spawn({
        let wallet = wallet.clone();
        async move { wallet.reconnect().await }
    });

    status.changed().await.unwrap();
    assert_eq!(*status.borrow_and_update(), WalletStatus::Connecting);

    wallet.disconnect();
    gate.notify_one();
    let result = tokio::time::timeout(Duration::from_secs(5), pending)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.unwrap(), None);
    assert_eq!(wallet.status(), WalletStatus::Disconnected);
}

#[tokio::test]
async fn test_refresh_balance_replaces_state() {
    let provider = Arc::new(ScriptedProvider::with_account(Some("1000000000000000000")));
    let (wallet, _notifier) = bridge(Some(provider.clone()));

    assert!(matches!(wallet.refresh_balance().await, Err(DashboardError::NotConnected)));

    wallet.connect().await.unwrap();
    provider.set_balance(Some("2500000000000000000"));

    let refreshed = wallet.refresh_balance().await.unwrap();
    assert_eq!(refreshed.balance.as_deref(), Some("2.500000"));
    assert_eq!(wallet.wallet(), Some(refreshed.clone()));

    // A failed refresh leaves the last known balance
    provider.set_balance(None);
    assert!(wallet.refresh_balance().await.is_err());
    assert_eq!(wallet.wallet(), Some(refreshed));
}

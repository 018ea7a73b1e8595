use std::sync::Arc;

use eth_dashboard::{
    coingecko_client::CoinGeckoClient,
    config::Config,
    notify::LogNotifier,
    provider::{ChainProvider, JsonRpcProvider},
    Dashboard, PriceFeed, WalletBridge,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (RUST_LOG included)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("🚀 Starting ETH dashboard...");

    let config = Config::from_env()?;

    let provider: Option<Arc<dyn ChainProvider>> = match &config.eth_rpc_url {
        Some(url) => {
            tracing::info!("🔗 Using wallet provider at {}", url);
            Some(Arc::new(JsonRpcProvider::new(url)) as Arc<dyn ChainProvider>)
        }
        None => {
            tracing::warn!("ETH_RPC_URL not set, wallet features unavailable");
            None
        }
    };

    let dashboard = Arc::new(Dashboard::new(WalletBridge::new(provider, Arc::new(LogNotifier))));

    // Pick up an already-authorized account, prompt only when asked to
    if let Err(e) = dashboard.wallet().reconnect().await {
        tracing::warn!("Wallet reconnect failed: {}", e);
    }
    if config.wallet_auto_connect && !dashboard.wallet().status().is_connected() {
        if let Err(e) = dashboard.wallet().connect().await {
            tracing::warn!("Wallet connect failed: {}", e);
        }
    }

    tracing::info!("📈 Polling ETH price every {}s", config.poll_interval_seconds);
    let feed = PriceFeed::new(Arc::new(CoinGeckoClient::new(&config.price_api_url)), config.poll_interval());

    let sink = dashboard.price_sink();
    let view = dashboard.clone();
    let handle = feed.start(move |sample| {
        sink(sample);
        tracing::info!("{}", view.summary());
    });

    tokio::signal::ctrl_c().await?;

    handle.cancel();
    dashboard.wallet().disconnect();
    tracing::info!("👋 ETH dashboard stopped");

    Ok(())
}

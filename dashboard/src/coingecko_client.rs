use crate::{
    error::{DashboardError, Result},
    price_feed::PriceSource,
    types::PriceSample,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct SimplePriceResponse {
    ethereum: Option<EthereumQuote>,
}

#[derive(Debug, Deserialize)]
struct EthereumQuote {
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    usd: Decimal,

    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    usd_24h_change: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    last_updated_at: Option<i64>,
}

/// Anything but an integer counts as a missing timestamp
fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_i64()))
}

/// Client for the CoinGecko `simple/price` endpoint
pub struct CoinGeckoClient {
    http: reqwest::Client,
    url: String,
}

impl CoinGeckoClient {
    pub fn new(url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.to_string(),
        }
    }

    pub async fn get_price(&self) -> Result<PriceSample> {
        debug!("Fetching ETH price from {}", self.url);

        let response = self.http.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::HttpStatus {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let body = response.text().await?;
        let sample = parse_simple_price(&body, chrono::Utc::now().timestamp())?;

        debug!(
            "CoinGecko ETH price: ${} ({}%)",
            sample.value_usd, sample.change_percent_24h
        );

        Ok(sample)
    }
}

#[async_trait]
impl PriceSource for CoinGeckoClient {
    async fn fetch_price(&self) -> Result<PriceSample> {
        self.get_price().await
    }
}

/// Parse a `simple/price` body. `now` stands in for a missing `last_updated_at`.
pub(crate) fn parse_simple_price(body: &str, now: i64) -> Result<PriceSample> {
    let response: SimplePriceResponse = serde_json::from_str(body)
        .map_err(|e| DashboardError::ParseError(format!("Invalid price response: {}", e)))?;

    let quote = response.ethereum.ok_or_else(|| {
        DashboardError::ParseError("Price response has no ethereum quote".to_string())
    })?;

    Ok(PriceSample {
        value_usd: quote.usd,
        change_percent_24h: quote.usd_24h_change.unwrap_or(Decimal::ZERO),
        observed_at_epoch_seconds: quote.last_updated_at.unwrap_or(now),
    })
}

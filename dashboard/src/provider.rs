use crate::error::{DashboardError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Chain provider capability handed to the wallet bridge
#[async_trait]
pub trait ChainProvider: Send + Sync {
    /// Ask the user to authorize accounts (`eth_requestAccounts`)
    async fn request_accounts(&self) -> Result<Vec<String>>;

    /// Accounts already authorized, without prompting (`eth_accounts`)
    async fn authorized_accounts(&self) -> Result<Vec<String>>;

    /// Raw balance in the smallest native unit, as a decimal or `0x` hex string
    async fn get_balance(&self, address: &str) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// Ethereum JSON-RPC provider over HTTP
pub struct JsonRpcProvider {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl JsonRpcProvider {
    pub fn new(url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.to_string(),
            next_id: AtomicU64::new(1),
        }
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        debug!("JSON-RPC {} (id {}) -> {}", method, id, self.url);

        let response = self.http.post(&self.url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::HttpStatus {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let body = response.text().await?;
        parse_rpc_response(&body)
    }

    async fn accounts(&self, method: &str) -> Result<Vec<String>> {
        let result = self.call(method, json!([])).await?;
        serde_json::from_value(result)
            .map_err(|e| DashboardError::ParseError(format!("Invalid {} result: {}", method, e)))
    }
}

#[async_trait]
impl ChainProvider for JsonRpcProvider {
    async fn request_accounts(&self) -> Result<Vec<String>> {
        self.accounts("eth_requestAccounts").await
    }

    async fn authorized_accounts(&self) -> Result<Vec<String>> {
        self.accounts("eth_accounts").await
    }

    async fn get_balance(&self, address: &str) -> Result<String> {
        let result = self.call("eth_getBalance", json!([address, "latest"])).await?;
        match result {
            Value::String(quantity) => Ok(quantity),
            other => Err(DashboardError::ParseError(format!(
                "Invalid eth_getBalance result: {}",
                other
            ))),
        }
    }
}

fn parse_rpc_response(body: &str) -> Result<Value> {
    let response: RpcResponse = serde_json::from_str(body)
        .map_err(|e| DashboardError::ParseError(format!("Invalid JSON-RPC response: {}", e)))?;

    if let Some(error) = response.error {
        return Err(DashboardError::Rpc {
            code: error.code,
            message: error.message,
        });
    }

    response
        .result
        .ok_or_else(|| DashboardError::ParseError("JSON-RPC response has no result".to_string()))
}

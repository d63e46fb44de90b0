//! Balance endpoints

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::{Address, BlockNumber, U256};

use crate::error::{Error, Result};

/// A single provider able to answer a balance query
#[async_trait]
pub trait BalanceEndpoint: Send + Sync {
    /// Identifier reported in `BalanceResult::succeeded_endpoint`
    fn id(&self) -> &str;

    /// Fetch the latest balance of `address` in wei
    async fn fetch_balance(&self, address: &str) -> Result<U256>;
}

/// JSON-RPC endpoint answering `eth_getBalance(address, "latest")`
pub struct JsonRpcEndpoint {
    url: String,
    provider: Provider<Http>,
}

impl JsonRpcEndpoint {
    /// Create an endpoint whose HTTP client gives up after `timeout`
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|e| Error::Config(format!("Invalid RPC URL {}: {}", url, e)))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Provider(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            url: url.to_string(),
            provider: Provider::new(Http::new_with_client(parsed, client)),
        })
    }
}

#[async_trait]
impl BalanceEndpoint for JsonRpcEndpoint {
    fn id(&self) -> &str {
        &self.url
    }

    async fn fetch_balance(&self, address: &str) -> Result<U256> {
        let address = Address::from_str(address)
            .map_err(|e| Error::InvalidAddress(format!("{}: {}", address, e)))?;

        self.provider
            .get_balance(address, Some(BlockNumber::Latest.into()))
            .await
            .map_err(|e| Error::Provider(format!("eth_getBalance via {} failed: {}", self.url, e)))
    }
}

impl std::fmt::Debug for JsonRpcEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonRpcEndpoint").field("url", &self.url).finish()
    }
}

//! Balance resolver configuration

use std::time::Duration;

use crate::error::{Error, Result};

/// Public Ethereum mainnet endpoints, in priority order
pub const DEFAULT_RPC_URLS: [&str; 5] = [
    "https://eth.llamarpc.com",
    "https://1rpc.io/eth",
    "https://ethereum-rpc.publicnode.com",
    "https://rpc.ankr.com/eth",
    "https://cloudflare-eth.com",
];

/// Default bound on a single endpoint attempt
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default pause between a failed attempt and the next endpoint
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(500);

/// Resolver configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Endpoint URLs, tried in order
    pub rpc_urls: Vec<String>,
    /// Per-attempt timeout
    pub attempt_timeout: Duration,
    /// Delay before moving to the next endpoint
    pub backoff: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            rpc_urls: DEFAULT_RPC_URLS.iter().map(|url| url.to_string()).collect(),
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

impl ResolverConfig {
    /// Create configuration for a custom endpoint list
    pub fn with_urls(rpc_urls: Vec<String>) -> Self {
        Self {
            rpc_urls,
            ..Self::default()
        }
    }

    /// Create configuration from environment variables
    ///
    /// Reads `ETHLITE_RPC_URLS` (comma separated), `ETHLITE_ATTEMPT_TIMEOUT_MS`
    /// and `ETHLITE_BACKOFF_MS`. Missing or unparsable values keep the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let rpc_urls = std::env::var("ETHLITE_RPC_URLS")
            .ok()
            .map(|raw| parse_url_list(&raw))
            .filter(|urls| !urls.is_empty())
            .unwrap_or(defaults.rpc_urls);

        let attempt_timeout = std::env::var("ETHLITE_ATTEMPT_TIMEOUT_MS")
            .ok()
            .and_then(|raw| raw.trim().parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.attempt_timeout);

        let backoff = std::env::var("ETHLITE_BACKOFF_MS")
            .ok()
            .and_then(|raw| raw.trim().parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.backoff);

        Self {
            rpc_urls,
            attempt_timeout,
            backoff,
        }
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.rpc_urls.is_empty() {
            return Err(Error::Config("At least one RPC endpoint is required".to_string()));
        }
        if self.attempt_timeout.is_zero() {
            return Err(Error::Config("Attempt timeout must be greater than zero".to_string()));
        }
        Ok(())
    }
}

/// Split a comma separated URL list, dropping blanks
fn parse_url_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}

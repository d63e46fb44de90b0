//! Balance resolution result types

use std::fmt;

use ethers::types::U256;
use serde::{Serialize, Deserialize};

use super::format::format_wei;

/// Why a resolution produced no balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceErrorKind {
    /// Every configured endpoint failed or timed out
    AllEndpointsFailed,
    /// The address was rejected before any endpoint was queried
    InvalidAddress,
}

impl fmt::Display for BalanceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllEndpointsFailed => f.write_str("Failed to fetch balance from all RPC endpoints"),
            Self::InvalidAddress => f.write_str("Invalid Ethereum address"),
        }
    }
}

/// Outcome of a single balance resolution
///
/// Failures are carried as data in `error_kind`; callers never receive an
/// `Err` from the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResult {
    /// Balance in wei as a decimal string
    pub raw_balance_wei: String,
    /// Balance in ether as an exact decimal string
    pub balance_in_eth: String,
    /// Identifier of the endpoint that answered
    #[serde(rename = "rpcEndpoint")]
    pub succeeded_endpoint: Option<String>,
    /// Set when no balance could be resolved
    pub error_kind: Option<BalanceErrorKind>,
}

impl BalanceResult {
    /// A balance answered by `endpoint`
    pub fn success(wei: U256, endpoint: impl Into<String>) -> Self {
        Self {
            raw_balance_wei: wei.to_string(),
            balance_in_eth: format_wei(wei),
            succeeded_endpoint: Some(endpoint.into()),
            error_kind: None,
        }
    }

    /// A zeroed balance tagged with `kind`
    pub fn failure(kind: BalanceErrorKind) -> Self {
        Self {
            raw_balance_wei: "0".to_string(),
            balance_in_eth: "0.0".to_string(),
            succeeded_endpoint: None,
            error_kind: Some(kind),
        }
    }

    /// Zero balance with no error, for state that has not been resolved yet
    pub fn empty() -> Self {
        Self {
            raw_balance_wei: "0".to_string(),
            balance_in_eth: "0.0".to_string(),
            succeeded_endpoint: None,
            error_kind: None,
        }
    }

    /// Whether the balance was resolved from an endpoint
    pub fn is_success(&self) -> bool {
        self.error_kind.is_none() && self.succeeded_endpoint.is_some()
    }
}

impl Default for BalanceResult {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_result() {
        let result = BalanceResult::success(U256::from(1_500_000_000_000_000_000u64), "https://rpc.example");

        assert_eq!(result.raw_balance_wei, "1500000000000000000");
        assert_eq!(result.balance_in_eth, "1.5");
        assert_eq!(result.succeeded_endpoint.as_deref(), Some("https://rpc.example"));
        assert!(result.is_success());
    }

    #[test]
    fn test_failure_result_is_zeroed() {
        let result = BalanceResult::failure(BalanceErrorKind::AllEndpointsFailed);

        assert_eq!(result.raw_balance_wei, "0");
        assert_eq!(result.balance_in_eth, "0.0");
        assert!(result.succeeded_endpoint.is_none());
        assert!(!result.is_success());
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = BalanceResult::success(U256::from(1_500_000_000_000_000_000u64), "https://rpc.example");
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["rawBalanceWei"], "1500000000000000000");
        assert_eq!(json["balanceInEth"], "1.5");
        assert_eq!(json["rpcEndpoint"], "https://rpc.example");
        assert!(json["errorKind"].is_null());
        assert!(json.get("balance_in_eth").is_none());

        let back: BalanceResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_error_kind_serialization() {
        let json = serde_json::to_string(&BalanceErrorKind::AllEndpointsFailed).unwrap();
        assert_eq!(json, "\"all_endpoints_failed\"");
    }
}

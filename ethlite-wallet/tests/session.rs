//! Tests for the wallet session lifecycle

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ethers::types::U256;

use ethlite_wallet::account::import_wallet;
use ethlite_wallet::balance::{
    format_balance, BalanceEndpoint, BalanceErrorKind, BalanceResolver, BalanceResult,
};
use ethlite_wallet::storage::{MemoryStore, WalletStorage};
use ethlite_wallet::{Error, Result, WalletSession};

const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
const OTHER_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon art";
const TEST_ADDRESS: &str = "0x9858EfFD232B4033E47d90003D41EC34EcaEda94";

/// Answers with a fixed balance for the reference address only
struct FixedEndpoint {
    wei: U256,
}

#[async_trait]
impl BalanceEndpoint for FixedEndpoint {
    fn id(&self) -> &str {
        "fixed"
    }

    async fn fetch_balance(&self, address: &str) -> Result<U256> {
        if address.eq_ignore_ascii_case(TEST_ADDRESS) {
            Ok(self.wei)
        } else {
            Err(Error::Provider(format!("unknown account {}", address)))
        }
    }
}

fn resolver(wei: u64) -> BalanceResolver {
    BalanceResolver::with_endpoints(
        vec![Arc::new(FixedEndpoint { wei: U256::from(wei) })],
        Duration::from_secs(10),
        Duration::from_millis(500),
    )
}

#[tokio::test]
async fn test_import_then_refresh_balance() {
    let mut session = WalletSession::new(MemoryStore::new(), resolver(1_234_500_000_000_000_000));

    let wallet = session.import_wallet(TEST_MNEMONIC).await.unwrap();
    assert_eq!(wallet.address, TEST_ADDRESS);

    let balance = session.refresh_balance().await.clone();

    assert!(balance.is_success());
    assert_eq!(balance.succeeded_endpoint.as_deref(), Some("fixed"));
    assert_eq!(balance.balance_in_eth, "1.2345");
    assert_eq!(format_balance(&balance.balance_in_eth), "1.23 ETH");
    assert_eq!(session.balance(), &balance);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_reports_exhaustion_for_unknown_account() {
    let mut session = WalletSession::new(MemoryStore::new(), resolver(1));

    session.create_wallet().await.unwrap();
    let balance = session.refresh_balance().await;

    assert_eq!(balance.error_kind, Some(BalanceErrorKind::AllEndpointsFailed));
    assert_eq!(balance.balance_in_eth, "0.0");
}

#[tokio::test]
async fn test_clear_wallet_resets_state() {
    let store = MemoryStore::new();
    let mut session = WalletSession::new(store.clone(), resolver(10));

    session.import_wallet(TEST_MNEMONIC).await.unwrap();
    session.refresh_balance().await;
    session.clear_wallet().await;

    assert!(session.wallet().is_none());
    assert_eq!(session.balance().raw_balance_wei, "0");
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_load_restores_persisted_wallet() {
    let store = MemoryStore::new();

    let mut first = WalletSession::new(store.clone(), resolver(0));
    first.import_wallet(TEST_MNEMONIC).await.unwrap();

    let mut second = WalletSession::new(store, resolver(0));
    assert!(second.load().await);

    let wallet = second.wallet().unwrap();
    assert_eq!(wallet.address, TEST_ADDRESS);
    assert_eq!(wallet.mnemonic, TEST_MNEMONIC);
}

#[tokio::test]
async fn test_load_after_external_clear_drops_balance() {
    let store = MemoryStore::new();
    let mut session = WalletSession::new(store.clone(), resolver(1_000_000_000_000_000_000));

    session.import_wallet(TEST_MNEMONIC).await.unwrap();
    assert_eq!(session.refresh_balance().await.balance_in_eth, "1.0");

    WalletStorage::new(store).clear_wallet().await;

    assert!(!session.load().await);
    assert!(session.wallet().is_none());
    assert_eq!(session.balance(), &BalanceResult::empty());
}

#[tokio::test]
async fn test_load_of_other_account_drops_balance() {
    let store = MemoryStore::new();
    let mut session = WalletSession::new(store.clone(), resolver(1_000_000_000_000_000_000));

    session.import_wallet(TEST_MNEMONIC).await.unwrap();
    session.refresh_balance().await;

    let other = import_wallet(OTHER_MNEMONIC).unwrap();
    WalletStorage::new(store).save_wallet(&other).await.unwrap();

    assert!(session.load().await);
    assert_eq!(session.wallet().unwrap().address, other.address);
    assert_eq!(session.balance(), &BalanceResult::empty());
}

#[tokio::test]
async fn test_load_of_same_account_keeps_balance() {
    let mut session = WalletSession::new(MemoryStore::new(), resolver(1_000_000_000_000_000_000));

    session.import_wallet(TEST_MNEMONIC).await.unwrap();
    let balance = session.refresh_balance().await.clone();

    assert!(session.load().await);
    assert_eq!(session.balance(), &balance);
}

#[tokio::test]
async fn test_load_without_wallet() {
    let mut session = WalletSession::new(MemoryStore::new(), resolver(0));
    assert!(!session.load().await);
}

#[tokio::test]
async fn test_onboarding_flag_is_independent_of_wallet() {
    let storage = WalletStorage::new(MemoryStore::new());

    storage.set_onboarding_completed().await;
    storage.clear_wallet().await;

    assert!(storage.is_onboarding_completed().await);
}

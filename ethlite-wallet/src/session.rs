//! Wallet session state
//!
//! Glues key derivation, persistence and balance resolution together for the
//! single account the application manages.

use tracing::{error, info};

use crate::account::{generate_wallet, import_wallet, WalletRecord};
use crate::balance::{BalanceResolver, BalanceResult};
use crate::error::Result;
use crate::storage::{SecureStore, WalletStorage};

/// The current wallet and its last resolved balance
pub struct WalletSession<S> {
    storage: WalletStorage<S>,
    resolver: BalanceResolver,
    wallet: Option<WalletRecord>,
    balance: BalanceResult,
}

impl<S: SecureStore> WalletSession<S> {
    /// Create a session with no wallet loaded
    pub fn new(store: S, resolver: BalanceResolver) -> Self {
        Self {
            storage: WalletStorage::new(store),
            resolver,
            wallet: None,
            balance: BalanceResult::empty(),
        }
    }

    /// The loaded wallet, if any
    pub fn wallet(&self) -> Option<&WalletRecord> {
        self.wallet.as_ref()
    }

    /// The last resolved balance
    pub fn balance(&self) -> &BalanceResult {
        &self.balance
    }

    /// Persistence used by this session
    pub fn storage(&self) -> &WalletStorage<S> {
        &self.storage
    }

    /// Restore the persisted wallet, returning whether one was found
    ///
    /// The cached balance is kept only if the same account is restored.
    pub async fn load(&mut self) -> bool {
        let loaded = self.storage.load_wallet().await;

        let current = self.wallet.as_ref().map(|wallet| wallet.address.as_str());
        if loaded.as_ref().map(|wallet| wallet.address.as_str()) != current {
            self.balance = BalanceResult::empty();
        }

        self.wallet = loaded;
        self.wallet.is_some()
    }

    /// Generate, persist and adopt a new wallet
    pub async fn create_wallet(&mut self) -> Result<&WalletRecord> {
        let wallet = generate_wallet()?;
        self.adopt(wallet).await
    }

    /// Import, persist and adopt a wallet from a recovery phrase
    pub async fn import_wallet(&mut self, mnemonic: &str) -> Result<&WalletRecord> {
        let wallet = import_wallet(mnemonic)?;
        self.adopt(wallet).await
    }

    /// Forget the wallet and its balance
    pub async fn clear_wallet(&mut self) {
        self.storage.clear_wallet().await;
        self.wallet = None;
        self.balance = BalanceResult::empty();
    }

    /// Resolve the balance of the loaded wallet
    ///
    /// Does nothing when no wallet is loaded.
    pub async fn refresh_balance(&mut self) -> &BalanceResult {
        if let Some(wallet) = &self.wallet {
            self.balance = self.resolver.get_balance(&wallet.address).await;
        }
        &self.balance
    }

    async fn adopt(&mut self, wallet: WalletRecord) -> Result<&WalletRecord> {
        if let Err(e) = self.storage.save_wallet(&wallet).await {
            error!("Failed to persist wallet {}: {}", wallet.address, e);
            return Err(e);
        }

        info!(address = %wallet.address, "Wallet ready");
        self.balance = BalanceResult::empty();
        Ok(self.wallet.insert(wallet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::error::Error;
    use crate::storage::MemoryStore;

    fn offline_session() -> WalletSession<MemoryStore> {
        let resolver = BalanceResolver::with_endpoints(Vec::new(), Duration::from_secs(1), Duration::ZERO);
        WalletSession::new(MemoryStore::new(), resolver)
    }

    #[tokio::test]
    async fn test_create_wallet_persists() {
        let mut session = offline_session();
        let address = session.create_wallet().await.unwrap().address.clone();

        let stored = session.storage().load_wallet().await.unwrap();
        assert_eq!(stored.address, address);
    }

    #[tokio::test]
    async fn test_invalid_import_leaves_state_untouched() {
        let mut session = offline_session();

        let err = session.import_wallet("definitely not valid").await.unwrap_err();

        assert!(matches!(err, Error::InvalidMnemonic(_)));
        assert!(session.wallet().is_none());
        assert!(session.storage().load_wallet().await.is_none());
    }

    #[tokio::test]
    async fn test_refresh_without_wallet_is_noop() {
        let mut session = offline_session();
        let balance = session.refresh_balance().await;

        assert_eq!(balance, &BalanceResult::empty());
    }
}

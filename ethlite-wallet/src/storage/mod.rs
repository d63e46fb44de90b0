//! Wallet persistence contract
//!
//! The wallet core does not encrypt or store anything itself. It talks to an
//! opaque key-value [`SecureStore`] supplied by the host application, which
//! must be secure at rest because the private key passes through it.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use tracing::{error, warn};

use crate::account::WalletRecord;
use crate::error::Result;

/// Key holding the serialized [`WalletRecord`]
pub const WALLET_KEY: &str = "wallet_data";

/// Key holding the onboarding flag
pub const ONBOARDING_KEY: &str = "onboarding_completed";

/// Opaque secure key-value store
#[async_trait]
pub trait SecureStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Read the value under `key`
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Remove `key`; removing a missing key is not an error
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Typed access to the wallet record and onboarding flag
#[derive(Debug, Clone)]
pub struct WalletStorage<S> {
    store: S,
}

impl<S: SecureStore> WalletStorage<S> {
    /// Wrap a secure store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persist the wallet record
    pub async fn save_wallet(&self, wallet: &WalletRecord) -> Result<()> {
        let json = serde_json::to_string(wallet)?;
        self.store.set(WALLET_KEY, &json).await.map_err(|e| {
            error!("Failed to save wallet: {}", e);
            e
        })
    }

    /// Load the persisted wallet record
    ///
    /// Missing, unreadable or corrupt data yields `None`.
    pub async fn load_wallet(&self) -> Option<WalletRecord> {
        let json = match self.store.get(WALLET_KEY).await {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                error!("Failed to load wallet: {}", e);
                return None;
            }
        };

        serde_json::from_str(&json)
            .map_err(|e| warn!("Discarding unreadable wallet record: {}", e))
            .ok()
    }

    /// Delete the persisted wallet record
    pub async fn clear_wallet(&self) {
        if let Err(e) = self.store.delete(WALLET_KEY).await {
            error!("Failed to clear wallet: {}", e);
        }
    }

    /// Whether onboarding has been completed
    pub async fn is_onboarding_completed(&self) -> bool {
        match self.store.get(ONBOARDING_KEY).await {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                error!("Failed to check onboarding status: {}", e);
                false
            }
        }
    }

    /// Mark onboarding as completed
    pub async fn set_onboarding_completed(&self) {
        if let Err(e) = self.store.set(ONBOARDING_KEY, "true").await {
            error!("Failed to set onboarding completed: {}", e);
        }
    }

    /// Reset the onboarding flag
    pub async fn reset_onboarding(&self) {
        if let Err(e) = self.store.delete(ONBOARDING_KEY).await {
            error!("Failed to reset onboarding: {}", e);
        }
    }
}

//! Wallet creation and import

use std::fmt;

use serde::{Serialize, Deserialize};
use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::crypto::mnemonic::{generate_mnemonic, mnemonic_to_seed, validate_mnemonic};
use crate::crypto::keys::ethereum::{derive_ethereum_key_pair, public_key_to_address, ETHEREUM_DERIVATION_PATH};
use super::address::to_checksum_address;

/// Key material for the single wallet account
///
/// Ownership passes to the caller; the record contains the private key and
/// must only be persisted through a secure store.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletRecord {
    /// EIP-55 checksummed address
    pub address: String,
    /// The recovery phrase, exactly as supplied
    pub mnemonic: String,
    /// `0x`-prefixed hex private key
    pub private_key: String,
}

impl fmt::Debug for WalletRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletRecord")
            .field("address", &self.address)
            .field("mnemonic", &"[REDACTED]")
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// Derivation path used for every wallet
pub fn derivation_path() -> &'static str {
    ETHEREUM_DERIVATION_PATH
}

/// Create a wallet from a freshly generated 12-word mnemonic
pub fn generate_wallet() -> Result<WalletRecord> {
    let mnemonic = generate_mnemonic()?;
    import_wallet(&mnemonic)
}

/// Restore a wallet from an existing 12- or 24-word mnemonic
pub fn import_wallet(mnemonic: &str) -> Result<WalletRecord> {
    if !validate_mnemonic(mnemonic) {
        return Err(Error::InvalidMnemonic("Invalid mnemonic phrase".to_string()));
    }

    derive_record(mnemonic).map_err(|e| {
        error!("Failed to derive wallet from mnemonic: {}", e);
        match e {
            Error::KeyDerivation(_) => e,
            other => Error::KeyDerivation(other.to_string()),
        }
    })
}

fn derive_record(mnemonic: &str) -> Result<WalletRecord> {
    let seed = mnemonic_to_seed(mnemonic, None)?;
    let key_pair = derive_ethereum_key_pair(&seed)?;

    let address = public_key_to_address(key_pair.public_key())?;
    let address = to_checksum_address(&address)?;

    debug!(%address, path = ETHEREUM_DERIVATION_PATH, "Derived wallet account");

    Ok(WalletRecord {
        address,
        mnemonic: mnemonic.to_string(),
        private_key: key_pair.private_key().to_hex(),
    })
}

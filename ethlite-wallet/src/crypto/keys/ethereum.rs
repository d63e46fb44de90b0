//! Ethereum key derivation

use sha3::{Digest, Keccak256};

use crate::error::{Error, Result};
use super::derivation::{DerivationPath, KeyPair, PublicKey};

/// BIP-44 path for the first external Ethereum account
pub const ETHEREUM_DERIVATION_PATH: &str = "m/44'/60'/0'/0/0";

/// Derive the Ethereum key pair at [`ETHEREUM_DERIVATION_PATH`]
pub fn derive_ethereum_key_pair(seed: &[u8]) -> Result<KeyPair> {
    let path: DerivationPath = ETHEREUM_DERIVATION_PATH.parse()?;
    path.derive(seed)
}

/// Get the lowercase `0x`-prefixed Ethereum address for a public key
pub fn public_key_to_address(public_key: &PublicKey) -> Result<String> {
    let public_key = public_key.as_bytes();

    if public_key.len() != 65 || public_key[0] != 0x04 {
        return Err(Error::KeyDerivation("Invalid Ethereum public key length".to_string()));
    }

    // Skip the 0x04 prefix; the address is the last 20 bytes of the hash
    let key_hash = keccak256(&public_key[1..]);

    Ok(format!("0x{}", hex::encode(&key_hash[12..])))
}

/// Calculate the Keccak-256 hash of data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

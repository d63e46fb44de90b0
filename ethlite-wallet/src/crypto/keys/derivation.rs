//! BIP-32 hierarchical key derivation over secp256k1

use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use hmac::digest::KeyInit;
use sha2::Sha512;
use secp256k1::{PublicKey as Secp256k1PublicKey, Secp256k1, SecretKey, Signing};

use crate::error::{Error, Result};

/// First hardened child index
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// A secp256k1 private key
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    /// The raw private key bytes
    bytes: [u8; 32],
}

impl PrivateKey {
    /// Create a new private key from bytes
    pub fn new(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Get the raw private key bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// `0x`-prefixed lowercase hex encoding
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.bytes))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

/// An uncompressed secp256k1 public key (65 bytes, `0x04` prefix)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    /// The raw public key bytes
    bytes: Vec<u8>,
}

impl PublicKey {
    /// Create a new public key from bytes
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Get the raw public key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// A derived key pair
#[derive(Debug, Clone)]
pub struct KeyPair {
    /// The private key
    private_key: PrivateKey,
    /// The public key
    public_key: PublicKey,
}

impl KeyPair {
    /// Build a key pair from a raw secret, computing the public half
    pub fn from_secret(secret: [u8; 32]) -> Result<Self> {
        let secret_key = SecretKey::from_slice(&secret)
            .map_err(|e| Error::KeyDerivation(format!("Invalid secret key: {}", e)))?;

        Ok(Self::from_secret_key(&Secp256k1::new(), &secret_key))
    }

    fn from_secret_key<C: Signing>(secp: &Secp256k1<C>, secret_key: &SecretKey) -> Self {
        let public_key = Secp256k1PublicKey::from_secret_key(secp, secret_key);

        Self {
            private_key: PrivateKey::new(secret_key.secret_bytes()),
            public_key: PublicKey::new(public_key.serialize_uncompressed().to_vec()),
        }
    }

    /// Get the private key
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Get the public key
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}

/// A parsed BIP-32 derivation path such as `m/44'/60'/0'/0/0`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationPath {
    indices: Vec<u32>,
}

impl DerivationPath {
    /// Child indices, hardened ones offset by [`HARDENED_OFFSET`]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Walk this path from the master key of `seed`
    pub fn derive(&self, seed: &[u8]) -> Result<KeyPair> {
        let secp = Secp256k1::new();

        let node = self
            .indices
            .iter()
            .try_fold(ExtendedKey::master(seed)?, |node, &index| node.child(&secp, index))?;

        Ok(KeyPair::from_secret_key(&secp, &node.secret))
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(path: &str) -> Result<Self> {
        let rest = if path == "m" {
            ""
        } else {
            path.strip_prefix("m/")
                .ok_or_else(|| Error::KeyDerivation(format!("Invalid derivation path: {}", path)))?
        };

        let mut indices = Vec::new();

        for component in rest.split('/').filter(|c| !c.is_empty()) {
            let (digits, hardened) = match component.strip_suffix('\'') {
                Some(digits) => (digits, true),
                None => (component, false),
            };

            let index = digits.parse::<u32>()
                .ok()
                .filter(|index| *index < HARDENED_OFFSET)
                .ok_or_else(|| Error::KeyDerivation(format!("Invalid derivation path component: {}", component)))?;

            indices.push(if hardened { index + HARDENED_OFFSET } else { index });
        }

        Ok(Self { indices })
    }
}

/// A private key together with its chain code
struct ExtendedKey {
    secret: SecretKey,
    chain_code: [u8; 32],
}

impl ExtendedKey {
    fn master(seed: &[u8]) -> Result<Self> {
        Self::from_hmac_output(hmac_sha512(b"Bitcoin seed", &[seed])?)
    }

    fn child<C: Signing>(&self, secp: &Secp256k1<C>, index: u32) -> Result<Self> {
        let index_bytes = index.to_be_bytes();

        let output = if index >= HARDENED_OFFSET {
            hmac_sha512(&self.chain_code, &[&[0u8][..], &self.secret.secret_bytes()[..], &index_bytes[..]])?
        } else {
            let public = Secp256k1PublicKey::from_secret_key(secp, &self.secret).serialize();
            hmac_sha512(&self.chain_code, &[&public[..], &index_bytes[..]])?
        };

        let Self { secret: tweak, chain_code } = Self::from_hmac_output(output)?;

        // child = IL + parent (mod n); a zero sum is an invalid child
        let secret = tweak
            .add_tweak(&self.secret.into())
            .map_err(|e| Error::KeyDerivation(format!("Invalid child key at index {}: {}", index, e)))?;

        Ok(Self { secret, chain_code })
    }

    /// Split `IL || IR`; an IL outside the curve order is rejected
    fn from_hmac_output(output: [u8; 64]) -> Result<Self> {
        let (key, code) = output.split_at(32);

        let secret = SecretKey::from_slice(key)
            .map_err(|e| Error::KeyDerivation(format!("Derived key out of range: {}", e)))?;

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(code);

        Ok(Self { secret, chain_code })
    }
}

fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> Result<[u8; 64]> {
    let mut mac = <Hmac<Sha512> as KeyInit>::new_from_slice(key)
        .map_err(|e| Error::KeyDerivation(format!("HMAC key rejected: {}", e)))?;

    for part in parts {
        mac.update(part);
    }

    let mut output = [0u8; 64];
    output.copy_from_slice(&mac.finalize().into_bytes());

    Ok(output)
}

//! Mnemonic phrase generation and handling

use bip39::Mnemonic;
use rand::{rngs::OsRng, RngCore};
use crate::error::{Error, Result};

/// Length of the BIP-39 seed in bytes
pub const SEED_LENGTH: usize = 64;

/// Supported mnemonic strengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MnemonicStrength {
    /// 12 words (128 bits)
    #[default]
    Words12,
    /// 24 words (256 bits)
    Words24,
}

impl MnemonicStrength {
    /// Get entropy length in bytes
    fn entropy_bytes(&self) -> usize {
        match self {
            Self::Words12 => 16,
            Self::Words24 => 32,
        }
    }

    /// Number of words produced for this strength
    pub fn word_count(&self) -> usize {
        match self {
            Self::Words12 => 12,
            Self::Words24 => 24,
        }
    }

    /// Map a word count back to a strength
    pub fn from_word_count(words: usize) -> Option<Self> {
        match words {
            12 => Some(Self::Words12),
            24 => Some(Self::Words24),
            _ => None,
        }
    }
}

/// Generate a new random 12-word mnemonic phrase
pub fn generate_mnemonic() -> Result<String> {
    generate_mnemonic_with_strength(MnemonicStrength::Words12)
}

/// Generate a new random mnemonic phrase with the specified strength
///
/// Entropy is drawn from the operating system's CSPRNG; the BIP-39 checksum
/// (first `entropy_bits / 32` bits of SHA-256 over the entropy) is appended
/// by the wordlist encoder.
pub fn generate_mnemonic_with_strength(strength: MnemonicStrength) -> Result<String> {
    let mut entropy = vec![0u8; strength.entropy_bytes()];
    OsRng.fill_bytes(&mut entropy);

    let mnemonic = Mnemonic::from_entropy(&entropy)
        .map_err(|e| Error::KeyDerivation(format!("Failed to encode entropy: {}", e)))?;

    Ok(mnemonic.to_string())
}

/// Validate a mnemonic phrase
///
/// Returns `false` for unknown words, unsupported word counts and checksum
/// mismatches. Matching is case-insensitive and tolerant of extra whitespace.
pub fn validate_mnemonic(phrase: &str) -> bool {
    parse_mnemonic(phrase).is_ok()
}

/// Generate a seed from a mnemonic phrase and optional passphrase
pub fn mnemonic_to_seed(phrase: &str, passphrase: Option<&str>) -> Result<[u8; SEED_LENGTH]> {
    let mnemonic = parse_mnemonic(phrase)?;
    Ok(mnemonic.to_seed(passphrase.unwrap_or("")))
}

/// Parse a phrase into its canonical lowercase, single-spaced form
fn parse_mnemonic(phrase: &str) -> Result<Mnemonic> {
    let normalized = phrase
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ");

    Mnemonic::parse_normalized(&normalized).map_err(|e| Error::InvalidMnemonic(e.to_string()))
}

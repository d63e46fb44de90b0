//! Address encoding and validation (EIP-55)

use crate::crypto::keys::ethereum::keccak256;
use crate::error::{Error, Result};

/// Number of hex digits in an Ethereum address
const ADDRESS_HEX_LEN: usize = 40;

/// Convert an address to its EIP-55 mixed-case checksum form
///
/// Accepts 40 hex digits with or without the `0x` prefix. All-lowercase and
/// all-uppercase inputs are taken as unchecksummed; a mixed-case input must
/// already carry a valid checksum.
pub fn to_checksum_address(address: &str) -> Result<String> {
    let digits = address.strip_prefix("0x").unwrap_or(address);

    if digits.len() != ADDRESS_HEX_LEN || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidAddress(format!("Malformed address: {}", address)));
    }

    let lower = digits.to_ascii_lowercase();
    let checksummed = checksum_encode(&lower);

    let is_mixed_case = digits != lower && digits != digits.to_ascii_uppercase();
    if is_mixed_case && digits != &checksummed[2..] {
        return Err(Error::InvalidAddress(format!("Bad address checksum: {}", address)));
    }

    Ok(checksummed)
}

/// Check whether a string is a valid Ethereum address
pub fn is_valid_address(address: &str) -> bool {
    to_checksum_address(address).is_ok()
}

/// Apply checksum casing to 40 lowercase hex digits
fn checksum_encode(lower: &str) -> String {
    let hash = keccak256(lower.as_bytes());

    let mut result = String::with_capacity(ADDRESS_HEX_LEN + 2);
    result.push_str("0x");

    for (i, ch) in lower.chars().enumerate() {
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };

        if ch.is_ascii_alphabetic() && nibble >= 8 {
            result.push(ch.to_ascii_uppercase());
        } else {
            result.push(ch);
        }
    }

    result
}

//! Key derivation and management
//!
//! This module provides BIP-32 derivation over secp256k1 and the Ethereum
//! specific account path and address hashing.

pub mod ethereum;
mod derivation;

pub use derivation::*;

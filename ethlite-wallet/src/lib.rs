//! ethlite Wallet Core - single-account Ethereum wallet SDK
//!
//! This library derives a deterministic Ethereum key from a BIP-39 recovery
//! phrase, renders its EIP-55 checksummed address, and resolves the address's
//! balance across a prioritized list of public JSON-RPC endpoints with
//! per-attempt timeouts, failover and request coalescing.

pub mod error;
pub mod crypto;
pub mod account;
pub mod balance;
pub mod storage;
pub mod session;

// Re-export commonly used types for convenience
pub use error::{Error, Result};
pub use account::{
    generate_wallet, import_wallet, is_valid_address, to_checksum_address, WalletRecord,
};
pub use balance::{
    format_balance, BalanceEndpoint, BalanceErrorKind, BalanceResolver, BalanceResult,
    ResolverConfig,
};
pub use crypto::mnemonic::{generate_mnemonic, validate_mnemonic};
pub use session::WalletSession;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

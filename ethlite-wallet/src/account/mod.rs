//! Account management functionality
//!
//! Turns a recovery phrase (or nothing) into a [`WalletRecord`] and provides
//! the pure address helpers used across the crate.

mod address;
mod wallet;

pub use address::*;
pub use wallet::*;

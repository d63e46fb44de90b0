//! Balance resolution functionality
//!
//! This module resolves an address's ether balance from a static, ordered
//! list of unreliable public JSON-RPC endpoints and formats it for display.

pub mod config;
pub mod endpoint;
mod format;
mod resolver;
mod types;

pub use config::ResolverConfig;
pub use endpoint::{BalanceEndpoint, JsonRpcEndpoint};
pub use format::*;
pub use resolver::*;
pub use types::*;

//! ethlite command-line interface
//!
//! Thin front end over the wallet core: key generation and import, phrase and
//! address checks, and balance lookups. Results are printed to stdout as JSON;
//! logs go to stderr.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ethlite_wallet::account::{derivation_path, import_wallet, to_checksum_address, WalletRecord};
use ethlite_wallet::balance::{format_balance, BalanceResolver, ResolverConfig};
use ethlite_wallet::crypto::mnemonic::{generate_mnemonic_with_strength, validate_mnemonic, MnemonicStrength};

#[derive(Parser)]
#[command(name = "ethlite")]
#[command(about = "Lightweight Ethereum wallet tools")]
#[command(version = ethlite_wallet::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new wallet
    Generate {
        /// Number of mnemonic words (12 or 24)
        #[arg(long, default_value_t = 12)]
        words: usize,
    },
    /// Restore a wallet from a recovery phrase
    Import { phrase: String },
    /// Check whether a recovery phrase is valid
    Validate { phrase: String },
    /// Print the EIP-55 checksummed form of an address
    Checksum { address: String },
    /// Resolve the ether balance of an address
    Balance {
        address: String,

        /// RPC endpoint to query, in priority order; repeat to add more
        #[arg(long = "rpc")]
        rpc_urls: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!("ethlite v{}", ethlite_wallet::VERSION);

    match cli.command {
        Commands::Generate { words } => handle_generate(words)?,
        Commands::Import { phrase } => handle_import(&phrase)?,
        Commands::Validate { phrase } => handle_validate(&phrase)?,
        Commands::Checksum { address } => handle_checksum(&address)?,
        Commands::Balance { address, rpc_urls } => handle_balance(&address, rpc_urls).await?,
    }

    Ok(())
}

fn handle_generate(words: usize) -> anyhow::Result<()> {
    let Some(strength) = MnemonicStrength::from_word_count(words) else {
        bail!("unsupported word count {}, expected 12 or 24", words);
    };

    let mnemonic = generate_mnemonic_with_strength(strength)?;
    let wallet = import_wallet(&mnemonic)?;
    info!(address = %wallet.address, "Generated wallet");

    print_wallet(&wallet)
}

fn handle_import(phrase: &str) -> anyhow::Result<()> {
    let wallet = import_wallet(phrase).context("failed to import wallet")?;
    info!(address = %wallet.address, "Imported wallet");

    print_wallet(&wallet)
}

fn handle_validate(phrase: &str) -> anyhow::Result<()> {
    let valid = validate_mnemonic(phrase);
    print_json(&json!({
        "valid": valid,
        "words": phrase.split_whitespace().count(),
    }))
}

fn handle_checksum(address: &str) -> anyhow::Result<()> {
    let checksummed = to_checksum_address(address)?;
    print_json(&json!({ "address": checksummed }))
}

async fn handle_balance(address: &str, rpc_urls: Vec<String>) -> anyhow::Result<()> {
    let mut config = ResolverConfig::from_env();
    if !rpc_urls.is_empty() {
        config.rpc_urls = rpc_urls;
    }

    let resolver = BalanceResolver::from_config(&config).context("invalid resolver configuration")?;
    let result = resolver.get_balance(address).await;

    let mut output = serde_json::to_value(&result)?;
    output["address"] = json!(address);
    output["display"] = json!(format_balance(&result.balance_in_eth));
    print_json(&output)?;

    if let Some(kind) = result.error_kind {
        bail!("{}", kind);
    }
    Ok(())
}

fn print_wallet(wallet: &WalletRecord) -> anyhow::Result<()> {
    let mut output = serde_json::to_value(wallet)?;
    output["derivationPath"] = json!(derivation_path());
    print_json(&output)
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_balance_accepts_repeated_rpc() {
        let cli = Cli::parse_from([
            "ethlite",
            "balance",
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "--rpc",
            "https://a.example",
            "--rpc",
            "https://b.example",
        ]);

        match cli.command {
            Commands::Balance { rpc_urls, .. } => {
                assert_eq!(rpc_urls, vec!["https://a.example", "https://b.example"]);
            }
            _ => panic!("expected balance command"),
        }
    }

    #[test]
    fn test_generate_defaults_to_twelve_words() {
        let cli = Cli::parse_from(["ethlite", "generate"]);
        assert!(matches!(cli.command, Commands::Generate { words: 12 }));
    }

    #[test]
    fn test_generate_rejects_odd_word_count() {
        assert!(handle_generate(15).is_err());
    }
}

//! RNS CLI
//!
//! Command-line interface for RNS name resolution: reverse lookups, owner
//! detail, availability and subgraph listings.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rns_api::{ApiConfig, ApiServer};
use rns_core::traits::WalletProvider;
use rns_core::types::{unix_now, QueryState};
use rns_core::DEFAULT_PAGE_SIZE;
use rns_resolver::{Listing, ListingQuery, ResolverConfig, RnsResolver};
use rns_wallet::{RpcWallet, SessionProvider, WatchOnlyWallet};

/// RNS - name resolution for the Revo naming service
#[derive(Parser)]
#[command(name = "rns")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(flatten)]
    network: NetworkArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct NetworkArgs {
    /// Chain to resolve against
    #[arg(long, global = true, env = "RNS_CHAIN_ID")]
    chain_id: Option<u64>,

    /// JSON-RPC endpoint, overrides the network's own
    #[arg(long, global = true, env = "RNS_RPC_URL")]
    rpc_url: Option<String>,

    /// JSON file with extra network configurations
    #[arg(long, global = true, env = "RNS_NETWORKS_FILE")]
    networks: Option<PathBuf>,

    /// Watch-only account to use as the current account
    #[arg(long, global = true, env = "RNS_WATCH_ADDRESS", conflicts_with = "wallet_rpc")]
    wallet: Option<String>,

    /// Node whose unlocked accounts act as the wallet
    #[arg(long, global = true, env = "RNS_WALLET_RPC")]
    wallet_rpc: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured networks
    Networks,

    /// Resolve an address to its name
    Reverse {
        /// Address to resolve; defaults to the connected wallet account
        address: Option<String>,
    },

    /// Show owner, expiry and grace period of a name
    Owner {
        /// Name with or without the root suffix
        name: String,
    },

    /// Check whether a name can be registered
    Available {
        /// Name with or without the root suffix
        name: String,
    },

    /// List names from the subgraph
    Names {
        /// Only names held by this owner
        #[arg(long)]
        owner: Option<String>,
        /// Page size
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        first: u32,
        /// Rows to skip
        #[arg(long, default_value_t = 0)]
        skip: u32,
    },

    /// Run the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3001")]
        port: u16,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "rns=debug,info"
    } else {
        "rns=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = resolver_config(&cli.network);

    match cli.command {
        Commands::Networks => cmd_networks(config, cli.json),
        Commands::Reverse { address } => cmd_reverse(config, &cli.network, address, cli.json).await,
        Commands::Owner { name } => cmd_owner(config, &name, cli.json).await,
        Commands::Available { name } => cmd_available(config, &name, cli.json).await,
        Commands::Names { owner, first, skip } => {
            let query = match owner {
                Some(owner) => ListingQuery::ByOwner { owner, first, skip },
                None => ListingQuery::All { first, skip },
            };
            cmd_names(config, query, cli.json).await
        }
        Commands::Serve { port, bind } => cmd_serve(config, &cli.network, port, &bind).await,
    }
}

/// Environment first, then command-line overrides.
fn resolver_config(args: &NetworkArgs) -> ResolverConfig {
    let mut config = ResolverConfig::from_env();
    if let Some(chain_id) = args.chain_id {
        config = config.with_chain(chain_id);
    }
    if let Some(url) = &args.rpc_url {
        config = config.with_rpc(url);
    }
    if let Some(path) = &args.networks {
        config = config.with_networks_file(path);
    }
    debug!(chain_id = config.chain_id, cache = config.enable_cache, "Resolver configured");
    config
}

fn wallet_provider(args: &NetworkArgs, chain_id: u64) -> Result<Option<Box<dyn WalletProvider>>> {
    if let Some(address) = &args.wallet {
        let wallet = WatchOnlyWallet::parse(address, Some(chain_id))
            .context("Invalid watch-only address")?;
        return Ok(Some(Box::new(wallet)));
    }
    if let Some(url) = &args.wallet_rpc {
        let wallet = RpcWallet::new(url).context("Invalid wallet RPC URL")?;
        return Ok(Some(Box::new(wallet)));
    }
    Ok(None)
}

fn spinner(message: impl Into<String>) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(80));
    Ok(pb)
}

/// Waits out a lookup behind a spinner and unwraps its state.
///
/// `Ok(None)` means the lookup was never dispatched.
async fn settle<T>(
    message: &str,
    lookup: impl std::future::Future<Output = QueryState<T>>,
) -> Result<Option<T>> {
    let pb = spinner(message)?;
    let state = lookup.await;
    pb.finish_and_clear();

    if state.is_disabled() {
        println!(
            "{}",
            "⚠️  Nothing looked up: malformed input, or the network has no contracts configured."
                .yellow()
        );
        return Ok(None);
    }
    state.into_result().map_err(|e| anyhow!("{}", e))
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// List configured networks
fn cmd_networks(config: ResolverConfig, json: bool) -> Result<()> {
    let table = config.network_table().context("Failed to load networks file")?;

    if json {
        let networks: Vec<_> = table.iter().collect();
        return print_json(&networks);
    }

    println!("{}", "🌐 Configured networks:".cyan().bold());
    for network in table.iter() {
        let marker = if network.chain_id == config.chain_id {
            "*".green().bold()
        } else {
            " ".normal()
        };
        println!("\n {} {} ({})", marker, network.name.bold(), network.chain_id);
        let show = |label: &str, value: Option<String>| {
            println!(
                "     {:<18} {}",
                label.dimmed(),
                value.unwrap_or_else(|| "-".into())
            );
        };
        show("Root name:", Some(network.root_name.clone()));
        show("RPC:", network.rpc_url.clone());
        show("Registry:", network.registry_address.map(|a| a.to_checksum_string()));
        show(
            "Reverse registrar:",
            network.reverse_registrar_address.map(|a| a.to_checksum_string()),
        );
        show("Resolver:", network.resolver_address.map(|a| a.to_checksum_string()));
        show("Subgraph:", network.subgraph_url.clone());
    }

    Ok(())
}

/// Resolve an address to its name
async fn cmd_reverse(
    config: ResolverConfig,
    args: &NetworkArgs,
    address: Option<String>,
    json: bool,
) -> Result<()> {
    let (resolver, wallet) = match address {
        Some(_) => (RnsResolver::with_config(config)?, None),
        None => {
            let provider = wallet_provider(args, config.chain_id)?
                .context(
                    "No address given and no wallet configured (use --wallet or --wallet-rpc)",
                )?;
            let wallet = SessionProvider::new(provider);
            wallet
                .connect()
                .await
                .with_context(|| format!("Failed to connect {} wallet", wallet.provider_name()))?;
            let resolver = RnsResolver::with_session(config, Some(wallet.reader()))?;
            (resolver, Some(wallet))
        }
    };

    let target = match &address {
        Some(address) => address.clone(),
        None => wallet
            .as_ref()
            .and_then(|w| w.session().address)
            .map(|a| a.to_checksum_string())
            .unwrap_or_default(),
    };
    println!("{} {}", "🔍 Reverse resolving:".cyan().bold(), target);

    let name = match &address {
        Some(address) => settle("Resolving...", resolver.reverse(address)).await?,
        None => {
            let state = resolver.reverse_current_account().await?;
            settle("Resolving...", async { state }).await?
        }
    };

    if let Some(wallet) = &wallet {
        wallet.disconnect().await?;
    }

    let Some(name) = name else {
        return Ok(());
    };
    if json {
        return print_json(&name);
    }

    if name.is_resolved() {
        println!("\n{}", "✅ Resolved:".green().bold());
        println!("   {} {}", "Name:".dimmed(), name.name);
        println!("   {} {}", "Full name:".dimmed(), name.full_name.unwrap_or_default());
    } else {
        println!("\n{}", "No reverse record for this address.".yellow());
    }

    Ok(())
}

/// Show owner detail of a name
async fn cmd_owner(config: ResolverConfig, name: &str, json: bool) -> Result<()> {
    println!("{} {}", "🔍 Looking up:".cyan().bold(), name);

    let resolver = RnsResolver::with_config(config)?;
    let Some(owner) = settle("Reading registry...", resolver.owner(name)).await? else {
        return Ok(());
    };

    if json {
        return print_json(&owner);
    }

    let record = &owner.record;
    println!("\n{} {}", "✅".green(), record.full_name.bold());
    println!("   {} {}", "Status:".dimmed(), record.status);
    match record.owner_address {
        Some(address) => println!(
            "   {} {} ({})",
            "Owner:".dimmed(),
            address.to_checksum_string(),
            record.display_address
        ),
        None => println!("   {} -", "Owner:".dimmed()),
    }

    if let Some(dates) = &owner.dates {
        let registration = dates
            .registration_date
            .as_ref()
            .map(|d| d.formatted.clone())
            .unwrap_or_else(|| "-".into());
        println!("   {} {}", "Registered:".dimmed(), registration);
        println!("   {} {}", "Expires:".dimmed(), dates.expiry_date.formatted);
        println!("   {} {}", "Grace period ends:".dimmed(), dates.grace_period_end_date.formatted);

        let now = unix_now();
        if dates.in_grace_period_at(now) {
            println!("\n{}", "⚠️  Expired; in grace period.".yellow());
        } else if dates.is_released_at(now) {
            println!("\n{}", "⚠️  Grace period is over.".red());
        }
    }

    Ok(())
}

/// Check availability of a name
async fn cmd_available(config: ResolverConfig, name: &str, json: bool) -> Result<()> {
    let resolver = RnsResolver::with_config(config)?;
    let Some(availability) = settle("Checking...", resolver.availability(name)).await? else {
        return Ok(());
    };

    if json {
        return print_json(&availability);
    }

    if availability.is_available() {
        println!("{} {} is available", "✅".green(), availability.full_name.bold());
    } else {
        println!("{} {} is taken", "❌".red(), availability.full_name.bold());
    }

    Ok(())
}

/// List names from the subgraph
async fn cmd_names(config: ResolverConfig, query: ListingQuery, json: bool) -> Result<()> {
    let resolver = RnsResolver::with_config(config)?;
    let Some(listing) = settle("Querying subgraph...", resolver.names(query)).await? else {
        return Ok(());
    };

    if json {
        return print_json(&listing);
    }

    let names = match &listing {
        Listing::Unavailable => {
            println!("{}", "⚠️  No subgraph configured for this network.".yellow());
            return Ok(());
        }
        Listing::Names(names) => names,
    };

    if names.is_empty() {
        println!("{}", "No names found.".yellow());
        return Ok(());
    }

    println!("{} {} name(s):", "📋".cyan(), names.len());
    for summary in names {
        let owner = summary
            .owner_address
            .map(|a| a.short())
            .unwrap_or_else(|| "-".into());
        let expiry = summary
            .expiry_date_with_grace
            .as_ref()
            .map(|d| d.formatted.as_str())
            .unwrap_or("-");
        println!(
            "   {:<32} {:<14} {}",
            summary.full_name.bold(),
            owner,
            expiry.dimmed()
        );
    }

    Ok(())
}

/// Run API server
async fn cmd_serve(
    config: ResolverConfig,
    args: &NetworkArgs,
    port: u16,
    bind: &str,
) -> Result<()> {
    println!("{}", "🚀 Starting RNS API server...".cyan().bold());
    println!("   {} http://{}:{}", "Listening on:".green(), bind, port);
    println!("   {} http://{}:{}/health", "Health check:".dimmed(), bind, port);
    println!("\n   Press Ctrl+C to stop.\n");

    let api_config = ApiConfig {
        resolver: config,
        watch_address: args.wallet.clone(),
    };
    let server = ApiServer::new(api_config).context("Failed to initialize API server")?;

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    server.run(addr).await?;

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
    fn test_overrides_apply_to_config() {
        let cli = Cli::try_parse_from([
            "rns",
            "--chain-id",
            "5",
            "--rpc-url",
            "http://node:8545",
            "owner",
            "alice",
        ])
        .unwrap();

        let config = resolver_config(&cli.network);

        assert_eq!(config.chain_id, 5);
        assert_eq!(config.rpc_url.as_deref(), Some("http://node:8545"));
    }

    #[test]
    fn test_names_by_owner() {
        let cli =
            Cli::try_parse_from(["rns", "names", "--owner", "0xabc", "--first", "10"]).unwrap();

        match cli.command {
            Commands::Names { owner, first, skip } => {
                assert_eq!(owner.as_deref(), Some("0xabc"));
                assert_eq!(first, 10);
                assert_eq!(skip, 0);
            }
            _ => panic!("expected names"),
        }
    }

    #[test]
    fn test_wallet_flags_conflict() {
        let result = Cli::try_parse_from([
            "rns",
            "--wallet",
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "--wallet-rpc",
            "http://127.0.0.1:8545",
            "reverse",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn test_watch_only_wallet_provider() {
        let cli = Cli::try_parse_from([
            "rns",
            "--wallet",
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "reverse",
        ])
        .unwrap();

        let provider = wallet_provider(&cli.network, 31337).unwrap().unwrap();
        assert_eq!(provider.name(), "watch-only");
    }
}

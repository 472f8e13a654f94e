//! Coin-Flip Game Agent CLI
//!
//! Command-line interface for the coin-flip game actions.

use alloy::primitives::Address;
use clap::{Parser, Subcommand};
use coinflip_agent::actions::{game_tracker_plugin, relay_plugin, Message, Plugin, RelayDeps};
use coinflip_agent::chain::{CoinFlipReader, RpcCoinFlip};
use coinflip_agent::config::{redact_url, Network, RpcConfig, Secrets};
use coinflip_agent::explorer::ExplorerClient;
use coinflip_agent::relay::{GelatoRelay, RelayService};
use coinflip_agent::wallet::AgentWallet;
use coinflip_agent::{Config, Error, GameCoordinator, HttpCoordinator, Result};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "coinflip-agent")]
#[command(about = "Coin-flip game agent: resolve rounds, place bets, relay contract calls")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Flip the coin for a round and submit the result
    Flip {
        #[arg(short, long)]
        round: u64,
    },

    /// Show the state of a round
    Status {
        #[arg(short, long)]
        round: u64,
    },

    /// Free-text game request, e.g. "bet 0.05 ETH on heads"
    Play {
        text: String,
    },

    /// Native balance of the agent wallet on the game network
    Balance,

    /// Call any contract function through the gasless relay
    Call {
        /// Path to a JSON ABI file
        #[arg(long)]
        abi: PathBuf,

        #[arg(short, long)]
        function: String,

        /// Arguments as a JSON array
        #[arg(long, default_value = "[]")]
        args: String,

        /// Target contract address
        #[arg(short, long)]
        target: String,

        /// Network key (sepolia, arbitrumSepolia, baseSepolia, inkSepolia)
        #[arg(long)]
        chain: String,
    },

    /// Fetch a verified contract ABI from the network's block explorer
    FetchAbi {
        #[arg(short, long)]
        address: String,

        #[arg(long, default_value = "sepolia")]
        chain: String,
    },

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = match cli.config {
        Some(path) => Config::from_file(&path)?,
        None => Config::default(),
    };
    let secrets = Secrets::from_env();

    match cli.command {
        Commands::Flip { round } => {
            let plugin = tracker(&config, &secrets)?;
            run_action(&plugin, "FLIP_COIN", Message::text(json!({ "round": round }).to_string()))
                .await?;
        }
        Commands::Status { round } => {
            let plugin = tracker(&config, &secrets)?;
            run_action(
                &plugin,
                "CHECK_GAME_STATE",
                Message::text(json!({ "round": round }).to_string()),
            )
            .await?;
        }
        Commands::Play { text } => {
            let plugin = relayer(config, &secrets, true)?;
            run_action(&plugin, "USER_FRIENDLY_CONTRACT_INTERACTION", Message::text(text)).await?;
        }
        Commands::Balance => {
            let plugin = relayer(config, &secrets, false)?;
            run_action(&plugin, "GET_WALLET_BALANCE", Message::text("")).await?;
        }
        Commands::Call {
            abi,
            function,
            args,
            target,
            chain,
        } => {
            let abi_text = std::fs::read_to_string(&abi)
                .map_err(|e| Error::InvalidArgument(format!("{}: {}", abi.display(), e)))?;
            let abi: Value = serde_json::from_str(&abi_text)?;
            let args: Value = serde_json::from_str(&args)?;
            let content = json!({
                "abi": abi,
                "functionName": function,
                "args": args,
                "target": target,
                "chain": chain,
            });

            let plugin = relayer(config, &secrets, false)?;
            run_action(
                &plugin,
                "CONTRACT_INTERACTION",
                Message::with_content(format!("call {} on {}", function, target), content),
            )
            .await?;
        }
        Commands::FetchAbi { address, chain } => {
            run_fetch_abi(&address, &chain).await?;
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            println!("{:?}", secrets);
        }
    }

    Ok(())
}

fn coordinator(config: &Config, secrets: &Secrets) -> Result<Arc<dyn GameCoordinator>> {
    let api_key = secrets.require_coordinator_key()?;
    Ok(Arc::new(HttpCoordinator::new(&config.coordinator, api_key)?))
}

fn tracker(config: &Config, secrets: &Secrets) -> Result<Plugin> {
    Ok(game_tracker_plugin(
        coordinator(config, secrets)?,
        config.game.min_bets,
    ))
}

/// Relay plugin; the coordinator key is only demanded when `with_game` is set
fn relayer(config: Config, secrets: &Secrets, with_game: bool) -> Result<Plugin> {
    let network = config.game.network;
    let rpc_config = RpcConfig::from_env();
    let rpc_url = rpc_config
        .for_network(network)
        .unwrap_or_else(|| network.public_rpc());
    tracing::info!(network = %network, rpc = %redact_url(rpc_url), "Connecting to chain");

    let reader: Arc<dyn CoinFlipReader> =
        Arc::new(RpcCoinFlip::new(rpc_url, config.game.contract_address)?);

    let relay: Option<Arc<dyn RelayService>> = match secrets.require_relay_key() {
        Ok(key) => Some(Arc::new(GelatoRelay::new(&config.relay, key))),
        Err(e) => {
            tracing::warn!(error = %e, "Relay disabled; only read-only actions are available");
            None
        }
    };

    let wallet = AgentWallet::from_env()?;
    tracing::info!(address = %wallet.address(), "Loaded agent wallet");

    let coordinator = if with_game {
        Some(coordinator(&config, secrets)?)
    } else {
        None
    };

    Ok(relay_plugin(RelayDeps {
        coordinator,
        config,
        reader,
        relay,
        wallet,
    }))
}

async fn run_action(plugin: &Plugin, name: &str, message: Message) -> Result<()> {
    let log_data = |content: &coinflip_agent::actions::Content| {
        if let Some(data) = &content.data {
            tracing::debug!(data = %data, "Action data");
        }
    };
    let text = plugin.dispatch(name, &message, Some(&log_data)).await?;
    println!("{}", text);
    Ok(())
}

async fn run_fetch_abi(address: &str, chain: &str) -> Result<()> {
    let network: Network = chain.parse()?;
    let address: Address = address
        .parse()
        .map_err(|e| Error::InvalidArgument(format!("Invalid address '{}': {}", address, e)))?;

    let client = ExplorerClient::for_network(network)?;
    let abi = client.fetch_abi(address).await?;

    println!("{}", serde_json::to_string_pretty(&abi)?);
    Ok(())
}

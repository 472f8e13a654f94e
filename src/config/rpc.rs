//! RPC endpoint configuration
//!
//! Resolution order per network:
//! 1. Per-chain env vars (INK_SEPOLIA_RPC_URL, SEPOLIA_RPC_URL, etc.)
//! 2. ALCHEMY_API_KEY - builds URLs for the networks Alchemy serves
//! 3. Public RPC fallbacks from the network table (rate limited)
//!
//! ```bash
//! export INK_SEPOLIA_RPC_URL="https://rpc-gel-sepolia.inkonchain.com"
//! export ALCHEMY_API_KEY="YOUR_KEY"
//! ```

use super::networks::Network;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use url::Url;

/// Environment variable names
mod env_vars {
    pub const ETH_RPC_URL: &str = "ETH_RPC_URL";
    pub const SEPOLIA_RPC_URL: &str = "SEPOLIA_RPC_URL";
    pub const ARBITRUM_SEPOLIA_RPC_URL: &str = "ARBITRUM_SEPOLIA_RPC_URL";
    pub const BASE_SEPOLIA_RPC_URL: &str = "BASE_SEPOLIA_RPC_URL";
    pub const INK_SEPOLIA_RPC_URL: &str = "INK_SEPOLIA_RPC_URL";

    pub const ALCHEMY_API_KEY: &str = "ALCHEMY_API_KEY";
}

/// Scheme, host and port of an RPC URL
///
/// Provider keys travel in the path, query or userinfo, so only the origin is
/// safe to log.
pub fn redact_url(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return "[REDACTED]".to_string();
    };
    match (parsed.host_str(), parsed.port()) {
        (Some(host), Some(port)) => format!("{}://{}:{}", parsed.scheme(), host, port),
        (Some(host), None) => format!("{}://{}", parsed.scheme(), host),
        (None, _) => "[REDACTED]".to_string(),
    }
}

/// RPC configuration for the supported networks
#[derive(Clone)]
pub struct RpcConfig {
    /// RPC URLs indexed by chain ID
    urls: HashMap<u64, String>,
}

impl RpcConfig {
    /// Create RPC config from environment variables
    pub fn from_env() -> Self {
        let mut urls = HashMap::new();

        for network in Network::ALL {
            if let Ok(url) = std::env::var(Self::env_var(network)) {
                tracing::debug!(network = %network, "Using per-chain RPC URL");
                urls.insert(network.chain_id(), url);
            }
        }

        if let Ok(key) = std::env::var(env_vars::ALCHEMY_API_KEY) {
            tracing::info!("Building RPC URLs from ALCHEMY_API_KEY");
            for network in Network::ALL {
                urls.entry(network.chain_id())
                    .or_insert_with(|| Self::alchemy_url(network, &key));
            }
        }

        for network in Network::ALL {
            urls.entry(network.chain_id()).or_insert_with(|| {
                tracing::debug!(network = %network, "No RPC configured, using public RPC");
                network.public_rpc().to_string()
            });
        }

        Self { urls }
    }

    /// Create with explicit RPC URLs
    pub fn with_urls(urls: HashMap<u64, String>) -> Self {
        Self { urls }
    }

    /// Get RPC URL for a chain
    pub fn get(&self, chain_id: u64) -> Option<&str> {
        self.urls.get(&chain_id).map(|s| s.as_str())
    }

    /// Get RPC URL for a network
    pub fn for_network(&self, network: Network) -> Option<&str> {
        self.get(network.chain_id())
    }

    /// Check if a chain is configured
    pub fn has_chain(&self, chain_id: u64) -> bool {
        self.urls.contains_key(&chain_id)
    }

    fn env_var(network: Network) -> &'static str {
        match network {
            Network::Mainnet => env_vars::ETH_RPC_URL,
            Network::Sepolia => env_vars::SEPOLIA_RPC_URL,
            Network::ArbitrumSepolia => env_vars::ARBITRUM_SEPOLIA_RPC_URL,
            Network::BaseSepolia => env_vars::BASE_SEPOLIA_RPC_URL,
            Network::InkSepolia => env_vars::INK_SEPOLIA_RPC_URL,
        }
    }

    fn alchemy_url(network: Network, key: &str) -> String {
        let subdomain = match network {
            Network::Mainnet => "eth-mainnet",
            Network::Sepolia => "eth-sepolia",
            Network::ArbitrumSepolia => "arb-sepolia",
            Network::BaseSepolia => "base-sepolia",
            Network::InkSepolia => "ink-sepolia",
        };
        format!("https://{}.g.alchemy.com/v2/{}", subdomain, key)
    }
}

impl fmt::Debug for RpcConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let urls: BTreeMap<u64, String> = self
            .urls
            .iter()
            .map(|(chain_id, url)| (*chain_id, redact_url(url)))
            .collect();
        f.debug_struct("RpcConfig").field("urls", &urls).finish()
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

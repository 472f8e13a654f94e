//! Static network table
//!
//! The game only runs on a handful of EVM networks. Each entry carries the
//! chain id, a display name, the native currency symbol, a public RPC
//! fallback and, where one exists, a block explorer API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chain ID constants
pub mod chains {
    pub const MAINNET: u64 = 1;
    pub const SEPOLIA: u64 = 11155111;
    pub const ARBITRUM_SEPOLIA: u64 = 421614;
    pub const BASE_SEPOLIA: u64 = 84532;
    pub const INK_SEPOLIA: u64 = 763373;
}

/// Block explorer API endpoint and the env var holding its key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplorerInfo {
    pub api_url: &'static str,
    pub api_key_env: &'static str,
}

/// Supported networks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Network {
    Mainnet,
    Sepolia,
    ArbitrumSepolia,
    BaseSepolia,
    InkSepolia,
}

impl Network {
    pub const ALL: [Network; 5] = [
        Network::Mainnet,
        Network::Sepolia,
        Network::ArbitrumSepolia,
        Network::BaseSepolia,
        Network::InkSepolia,
    ];

    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Mainnet => chains::MAINNET,
            Network::Sepolia => chains::SEPOLIA,
            Network::ArbitrumSepolia => chains::ARBITRUM_SEPOLIA,
            Network::BaseSepolia => chains::BASE_SEPOLIA,
            Network::InkSepolia => chains::INK_SEPOLIA,
        }
    }

    /// Identifier used in messages and config files
    pub fn key(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Sepolia => "sepolia",
            Network::ArbitrumSepolia => "arbitrumSepolia",
            Network::BaseSepolia => "baseSepolia",
            Network::InkSepolia => "inkSepolia",
        }
    }

    pub fn native_symbol(&self) -> &'static str {
        "ETH"
    }

    /// Public RPC endpoint (rate limited, for testing only)
    pub fn public_rpc(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://eth.llamarpc.com",
            Network::Sepolia => "https://ethereum-sepolia-rpc.publicnode.com",
            Network::ArbitrumSepolia => "https://sepolia-rollup.arbitrum.io/rpc",
            Network::BaseSepolia => "https://sepolia.base.org",
            Network::InkSepolia => "https://rpc-gel-sepolia.inkonchain.com",
        }
    }

    pub fn explorer(&self) -> Option<ExplorerInfo> {
        match self {
            Network::Mainnet => Some(ExplorerInfo {
                api_url: "https://api.etherscan.io/api",
                api_key_env: "ETHERSCAN_API_KEY",
            }),
            Network::Sepolia => Some(ExplorerInfo {
                api_url: "https://api-sepolia.etherscan.io/api",
                api_key_env: "ETHERSCAN_API_KEY",
            }),
            Network::ArbitrumSepolia => Some(ExplorerInfo {
                api_url: "https://api-sepolia.arbiscan.io/api",
                api_key_env: "ARBISCAN_API_KEY",
            }),
            Network::BaseSepolia => Some(ExplorerInfo {
                api_url: "https://api-sepolia.basescan.org/api",
                api_key_env: "BASESCAN_API_KEY",
            }),
            Network::InkSepolia => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Network {
    type Err = crate::Error;

    /// Accepts the camelCase key, common aliases and spaced or dashed names,
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "mainnet" | "ethereum" => Ok(Network::Mainnet),
            "sepolia" => Ok(Network::Sepolia),
            "arbitrumsepolia" => Ok(Network::ArbitrumSepolia),
            "basesepolia" => Ok(Network::BaseSepolia),
            "inksepolia" => Ok(Network::InkSepolia),
            _ => Err(crate::Error::InvalidArgument(format!(
                "Unknown network: {}",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keys_and_aliases() {
        assert_eq!("inkSepolia".parse::<Network>().unwrap(), Network::InkSepolia);
        assert_eq!("ink-sepolia".parse::<Network>().unwrap(), Network::InkSepolia);
        assert_eq!("Base Sepolia".parse::<Network>().unwrap(), Network::BaseSepolia);
        assert_eq!("ethereum".parse::<Network>().unwrap(), Network::Mainnet);
        assert!("solana".parse::<Network>().is_err());
    }

    #[test]
    fn serde_uses_camel_case_keys() {
        let json = serde_json::to_string(&Network::ArbitrumSepolia).unwrap();
        assert_eq!(json, "\"arbitrumSepolia\"");
        let parsed: Network = serde_json::from_str("\"inkSepolia\"").unwrap();
        assert_eq!(parsed, Network::InkSepolia);
    }

    #[test]
    fn ink_sepolia_has_no_explorer() {
        assert!(Network::InkSepolia.explorer().is_none());
        assert_eq!(
            Network::Sepolia.explorer().unwrap().api_url,
            "https://api-sepolia.etherscan.io/api"
        );
    }
}

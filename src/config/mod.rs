//! Configuration for the coin-flip agent
//!
//! Non-secret settings live in [`Config`], which can be loaded from a JSON
//! file and falls back to defaults. Credentials live in [`Secrets`] and are
//! only ever read from the environment.

pub mod networks;
pub mod rpc;

use alloy::primitives::{address, Address};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

pub use networks::{ExplorerInfo, Network};
pub use rpc::{redact_url, RpcConfig};

/// Coordinator API key environment variable name
pub const COORDINATOR_API_KEY_ENV: &str = "COORDINATOR_API_KEY";
/// Gelato relay sponsor key environment variable name
pub const RELAY_API_KEY_ENV: &str = "GELATO_RELAY_API_KEY";
/// Agent signer private key environment variable name
pub const PRIVATE_KEY_ENV: &str = "EVM_PRIVATE_KEY";

/// Coin-flip contract deployed on Ink Sepolia
pub const DEFAULT_COIN_FLIP_CONTRACT: Address =
    address!("0616d765019aa11ec5a50e2aea0e371b064c64f0");

/// Game coordinator backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    pub base_url: Url,
    /// Request timeout in milliseconds; unset keeps the transport default
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl CoordinatorConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("https://game-coordinator-backend.onrender.com")
                .expect("static coordinator URL"),
            timeout_ms: None,
        }
    }
}

/// Gasless relay settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Relay API base URL
    pub base_url: Url,
    /// Public task status page; the task id is appended
    pub status_url: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("https://api.gelato.digital").expect("static relay URL"),
            status_url: "https://relay.gelato.digital/tasks/status".to_string(),
        }
    }
}

/// Coin-flip game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Network the game contract lives on
    pub network: Network,
    /// Coin-flip contract address
    pub contract_address: Address,
    /// Minimum number of bets before a round may be resolved
    pub min_bets: usize,
    /// Bet amount (ETH) used when the message names none
    pub default_bet_eth: String,
    /// Range (ETH) for bets picked on the user's behalf
    pub random_bet_min_eth: f64,
    pub random_bet_max_eth: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            network: Network::InkSepolia,
            contract_address: DEFAULT_COIN_FLIP_CONTRACT,
            min_bets: 2,
            default_bet_eth: "0.01".to_string(),
            random_bet_min_eth: 0.01,
            random_bet_max_eth: 0.05,
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub coordinator: CoordinatorConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub game: GameConfig,
}

impl Config {
    /// Load a JSON config file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("{}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.game.min_bets < 2 {
            return Err(crate::Error::Config(
                "game.min_bets must be at least 2".to_string(),
            ));
        }
        if !(self.game.random_bet_min_eth > 0.0
            && self.game.random_bet_min_eth < self.game.random_bet_max_eth)
        {
            return Err(crate::Error::Config(
                "game.random_bet_min_eth must be positive and below random_bet_max_eth"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Credentials injected at process start
///
/// Never serialized; `Debug` only reports which secrets are present.
#[derive(Default)]
pub struct Secrets {
    pub coordinator_api_key: Option<SecretString>,
    pub relay_api_key: Option<SecretString>,
}

impl Secrets {
    pub fn from_env() -> Self {
        Self {
            coordinator_api_key: read_secret(COORDINATOR_API_KEY_ENV),
            relay_api_key: read_secret(RELAY_API_KEY_ENV),
        }
    }

    /// Explorer keys are looked up lazily since each explorer names its own variable
    pub fn explorer_api_key(explorer: &ExplorerInfo) -> Option<SecretString> {
        read_secret(explorer.api_key_env)
    }

    pub fn require_coordinator_key(&self) -> crate::Result<SecretString> {
        self.coordinator_api_key.clone().ok_or_else(|| {
            crate::Error::Config(format!("{} is not configured", COORDINATOR_API_KEY_ENV))
        })
    }

    pub fn require_relay_key(&self) -> crate::Result<SecretString> {
        self.relay_api_key.clone().ok_or_else(|| {
            crate::Error::Config(format!("{} is not configured", RELAY_API_KEY_ENV))
        })
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field(
                "coordinator_api_key",
                &self.coordinator_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field(
                "relay_api_key",
                &self.relay_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

fn read_secret(var: &str) -> Option<SecretString> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from)
}

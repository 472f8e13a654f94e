//! Agent wallet
//!
//! The agent acts as a single player identified by the address of its
//! signing key. Bets are relayed as sponsored calls, so the key is only used
//! to derive that address and is dropped straight after.

use crate::config::PRIVATE_KEY_ENV;
use crate::{Error, Result};
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AgentWallet {
    address: Address,
}

impl AgentWallet {
    /// Load from [`PRIVATE_KEY_ENV`]
    pub fn from_env() -> Result<Self> {
        Self::from_env_var(PRIVATE_KEY_ENV)
    }

    pub fn from_env_var(var_name: &str) -> Result<Self> {
        let key_hex = std::env::var(var_name).map_err(|_| {
            Error::Wallet(format!(
                "Environment variable {} not set. Required for wallet initialization.",
                var_name
            ))
        })?;

        Self::from_hex(&key_hex)
    }

    /// Derive the wallet from a hex private key, with or without `0x`
    pub fn from_hex(key_hex: &str) -> Result<Self> {
        let key_hex = key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| Error::Wallet(format!("Invalid private key: {}", e)))?;

        Ok(Self {
            address: signer.address(),
        })
    }

    /// Wallet for a known address, without a key
    pub fn watch(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Checksummed address
    pub fn address_string(&self) -> String {
        self.address.to_checksum(None)
    }
}

impl std::fmt::Debug for AgentWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentWallet")
            .field("address", &self.address)
            .finish()
    }
}

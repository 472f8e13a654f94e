//! Block explorer ABI lookup (Etherscan-compatible APIs)

use crate::config::{Network, Secrets};
use crate::{Error, Result};
use alloy::json_abi::JsonAbi;
use alloy::primitives::Address;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ExplorerResponse {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: String,
}

pub struct ExplorerClient {
    client: Client,
    api_url: String,
    api_key: SecretString,
    network: Network,
}

impl ExplorerClient {
    /// Client for the network's explorer, keyed from its environment variable
    pub fn for_network(network: Network) -> Result<Self> {
        let explorer = network.explorer().ok_or_else(|| {
            Error::Explorer(format!("No explorer configured for chain: {}", network))
        })?;
        let api_key = Secrets::explorer_api_key(&explorer).ok_or_else(|| {
            Error::Config(format!(
                "{} is not set in the environment.",
                explorer.api_key_env
            ))
        })?;
        Ok(Self::with_endpoint(explorer.api_url, api_key, network))
    }

    pub fn with_endpoint(api_url: impl Into<String>, api_key: SecretString, network: Network) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
            api_key,
            network,
        }
    }

    /// Fetch the verified ABI of `address`
    pub async fn fetch_abi(&self, address: Address) -> Result<JsonAbi> {
        let address_str = address.to_string();
        tracing::debug!(address = %address_str, network = %self.network, "Fetching contract ABI");

        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("module", "contract"),
                ("action", "getabi"),
                ("address", address_str.as_str()),
                ("apikey", self.api_key.expose_secret()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Explorer(format!(
                "Failed to fetch ABI for contract {} on {}: HTTP {}",
                address_str, self.network, status
            )));
        }

        let body: ExplorerResponse = response.json().await?;
        if body.status == "0" || body.result.trim().is_empty() {
            tracing::warn!(
                address = %address_str,
                message = %body.message,
                result = %body.result,
                "Explorer refused ABI request"
            );
            return Err(Error::Explorer(format!(
                "Failed to fetch ABI for contract {} on {}",
                address_str, self.network
            )));
        }

        serde_json::from_str(&body.result)
            .map_err(|e| Error::Abi(format!("explorer returned an invalid ABI: {}", e)))
    }
}

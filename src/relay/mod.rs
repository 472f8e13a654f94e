//! Gasless transaction relay
//!
//! Calls are submitted as sponsored calls: the relay pays gas and the
//! sponsor key authorizes the spend. Submission returns a task handle that
//! can be tracked on the relay's public status page.

mod executor;

pub use executor::{encode_function_call, validate_call, ContractCall, ContractCallExecutor};

use crate::config::RelayConfig;
use crate::{Error, Result};
use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Opaque relay task handle
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    /// Public tracking link for this task under `status_base`
    pub fn status_url(&self, status_base: &str) -> String {
        format!("{}/{}", status_base.trim_end_matches('/'), self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An encoded call ready for sponsorship
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SponsoredCallRequest {
    pub chain_id: u64,
    pub target: Address,
    pub data: Bytes,
}

/// Submits sponsored calls
#[async_trait]
pub trait RelayService: Send + Sync {
    async fn sponsored_call(&self, request: &SponsoredCallRequest) -> Result<TaskId>;
}

#[async_trait]
impl<T: RelayService + ?Sized> RelayService for Arc<T> {
    async fn sponsored_call(&self, request: &SponsoredCallRequest) -> Result<TaskId> {
        (**self).sponsored_call(request).await
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SponsoredCallBody<'a> {
    chain_id: String,
    target: String,
    data: &'a Bytes,
    sponsor_api_key: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SponsoredCallResponse {
    task_id: String,
}

/// Gelato relay client
pub struct GelatoRelay {
    client: Client,
    base_url: Url,
    api_key: SecretString,
}

impl GelatoRelay {
    pub fn new(config: &RelayConfig, api_key: SecretString) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
            api_key,
        }
    }

    fn sponsored_call_url(&self) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Relay URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["relays", "v2", "sponsored-call"]);
        Ok(url)
    }
}

#[async_trait]
impl RelayService for GelatoRelay {
    async fn sponsored_call(&self, request: &SponsoredCallRequest) -> Result<TaskId> {
        let url = self.sponsored_call_url()?;
        let body = SponsoredCallBody {
            chain_id: request.chain_id.to_string(),
            target: request.target.to_checksum(None),
            data: &request.data,
            sponsor_api_key: self.api_key.expose_secret(),
        };

        tracing::info!(
            chain_id = request.chain_id,
            contract = %request.target,
            calldata_len = request.data.len(),
            "Submitting sponsored call"
        );

        let response = self.client.post(url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Relay(format!("{}: {}", status, text)));
        }

        let parsed: SponsoredCallResponse = response.json().await?;
        if parsed.task_id.is_empty() {
            return Err(Error::Relay("relay returned an empty task id".to_string()));
        }

        tracing::info!(task_id = %parsed.task_id, "Sponsored call accepted");
        Ok(TaskId(parsed.task_id))
    }
}

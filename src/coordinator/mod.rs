//! Game coordinator client
//!
//! The coordinator owns all round and bet state. This module only reads it
//! and submits resolutions; every request carries the shared API key.

mod types;

pub use types::{Bet, ResolveRequest, Round};

use crate::config::CoordinatorConfig;
use crate::game::{CoinSide, RoundId};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use url::Url;

/// Header carrying the coordinator API key
pub const API_KEY_HEADER: &str = "x-api-key";
/// Header letting the coordinator collapse duplicate resolutions
pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

/// Read and resolve operations of the game coordinator
#[async_trait]
pub trait GameCoordinator: Send + Sync {
    /// Fetch a round; a missing round is `Error::RoundNotFound`
    async fn fetch_round(&self, round: RoundId) -> Result<Round>;

    /// Fetch every bet placed in a round
    async fn fetch_bets(&self, round: RoundId) -> Result<Vec<Bet>>;

    /// Record the outcome of a round.
    ///
    /// Concurrent callers may both observe the round as unresolved. Each
    /// submission carries the key `resolve-round-{round}` so the coordinator
    /// can accept only the first; a rejected duplicate surfaces as
    /// `Error::AlreadyResolved`.
    async fn resolve_round(&self, round: RoundId, result: CoinSide) -> Result<()>;
}

#[async_trait]
impl<T: GameCoordinator + ?Sized> GameCoordinator for Arc<T> {
    async fn fetch_round(&self, round: RoundId) -> Result<Round> {
        (**self).fetch_round(round).await
    }

    async fn fetch_bets(&self, round: RoundId) -> Result<Vec<Bet>> {
        (**self).fetch_bets(round).await
    }

    async fn resolve_round(&self, round: RoundId, result: CoinSide) -> Result<()> {
        (**self).resolve_round(round, result).await
    }
}

/// Idempotency key used for a round's resolution
pub fn resolution_key(round: RoundId) -> String {
    format!("resolve-round-{}", round)
}

/// HTTP implementation of [`GameCoordinator`]
pub struct HttpCoordinator {
    client: Client,
    base_url: Url,
    api_key: SecretString,
}

impl HttpCoordinator {
    pub fn new(config: &CoordinatorConfig, api_key: SecretString) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.clone(),
            api_key,
        })
    }

    /// Append path segments to the base URL, keeping any base path prefix
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                Error::Config(format!(
                    "Coordinator URL cannot be a base: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn check_status(response: Response, round: RoundId) -> Result<Response> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::RoundNotFound(round));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Coordinator {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl GameCoordinator for HttpCoordinator {
    async fn fetch_round(&self, round: RoundId) -> Result<Round> {
        let url = self.endpoint(&["round", &round.to_string()])?;
        tracing::debug!(round, url = %url, "Fetching round");

        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .send()
            .await?;

        let round_data = Self::check_status(response, round)
            .await?
            .json::<Round>()
            .await?;
        Ok(round_data)
    }

    async fn fetch_bets(&self, round: RoundId) -> Result<Vec<Bet>> {
        let url = self.endpoint(&["bets", &round.to_string()])?;
        tracing::debug!(round, url = %url, "Fetching bets");

        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .send()
            .await?;

        let bets = Self::check_status(response, round)
            .await?
            .json::<Vec<Bet>>()
            .await?;
        Ok(bets)
    }

    async fn resolve_round(&self, round: RoundId, result: CoinSide) -> Result<()> {
        let url = self.endpoint(&["resolve"])?;
        let body = ResolveRequest {
            round,
            result: result.as_bool(),
        };
        tracing::debug!(round, result = %result, "Submitting resolution");

        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .header(IDEMPOTENCY_HEADER, resolution_key(round))
            .json(&body)
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            return Err(Error::AlreadyResolved(round));
        }
        Self::check_status(response, round).await?;
        Ok(())
    }
}

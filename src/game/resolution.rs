//! Round resolution workflow
//!
//! A single pass over one round: fetch it, check it is still open, check
//! that enough bets were placed, toss the coin and submit the result. Any
//! failure short-circuits; nothing is persisted between invocations, so a
//! retry after a failed submit starts over and tosses a fresh coin.

use super::{CoinSide, CoinToss, RandomCoin, RoundId, MIN_BETS_TO_RESOLVE};
use crate::coordinator::GameCoordinator;
use crate::{Error, Result};

/// Terminal state of one resolution attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// The coordinator has no such round
    NotFound(RoundId),
    /// The round was already resolved; nothing was submitted
    AlreadyResolved(RoundId),
    /// Too few bets to resolve; nothing was submitted
    InsufficientBets {
        round: RoundId,
        count: usize,
        required: usize,
    },
    /// The outcome was accepted by the coordinator
    Resolved { round: RoundId, side: CoinSide },
}

impl ResolutionOutcome {
    pub fn round(&self) -> RoundId {
        match self {
            ResolutionOutcome::NotFound(round)
            | ResolutionOutcome::AlreadyResolved(round)
            | ResolutionOutcome::InsufficientBets { round, .. }
            | ResolutionOutcome::Resolved { round, .. } => *round,
        }
    }
}

/// Resolves rounds against a coordinator using a coin
pub struct ResolutionWorkflow<C, T = RandomCoin> {
    coordinator: C,
    coin: T,
    min_bets: usize,
}

impl<C: GameCoordinator> ResolutionWorkflow<C, RandomCoin> {
    /// Workflow with a fair coin
    pub fn with_fair_coin(coordinator: C) -> Self {
        Self::new(coordinator, RandomCoin)
    }
}

impl<C: GameCoordinator, T: CoinToss> ResolutionWorkflow<C, T> {
    pub fn new(coordinator: C, coin: T) -> Self {
        Self {
            coordinator,
            coin,
            min_bets: MIN_BETS_TO_RESOLVE,
        }
    }

    /// Raise the bet threshold; it never drops below two
    pub fn with_min_bets(mut self, min_bets: usize) -> Self {
        self.min_bets = min_bets.max(MIN_BETS_TO_RESOLVE);
        self
    }

    pub fn min_bets(&self) -> usize {
        self.min_bets
    }

    /// Run the workflow for one round
    pub async fn resolve(&self, round: RoundId) -> Result<ResolutionOutcome> {
        let round_data = match self.coordinator.fetch_round(round).await {
            Ok(data) => data,
            Err(Error::RoundNotFound(_)) => {
                tracing::warn!(round, "Round not found");
                return Ok(ResolutionOutcome::NotFound(round));
            }
            Err(e) => return Err(e),
        };

        if round_data.resolved {
            tracing::warn!(round, "Round is already resolved");
            return Ok(ResolutionOutcome::AlreadyResolved(round));
        }

        let bets = match self.coordinator.fetch_bets(round).await {
            Ok(bets) => bets,
            Err(Error::RoundNotFound(_)) => return Ok(ResolutionOutcome::NotFound(round)),
            Err(e) => return Err(e),
        };

        if bets.len() < self.min_bets {
            tracing::warn!(
                round,
                bets = bets.len(),
                required = self.min_bets,
                "Not enough bets to resolve round"
            );
            return Ok(ResolutionOutcome::InsufficientBets {
                round,
                count: bets.len(),
                required: self.min_bets,
            });
        }

        let side = self.coin.toss();
        tracing::info!(round, result = %side, "Coin flipped");

        match self.coordinator.resolve_round(round, side).await {
            Ok(()) => {}
            Err(Error::AlreadyResolved(_)) => {
                tracing::warn!(round, "Coordinator rejected duplicate resolution");
                return Ok(ResolutionOutcome::AlreadyResolved(round));
            }
            Err(Error::RoundNotFound(_)) => return Ok(ResolutionOutcome::NotFound(round)),
            Err(e) => return Err(e),
        }

        tracing::info!(round, result = %side, "Round resolved");
        Ok(ResolutionOutcome::Resolved { round, side })
    }
}

//! Read-only round queries

use super::RoundId;
use crate::coordinator::{Bet, GameCoordinator, Round};
use crate::Result;

/// A round together with its bets, fetched in one go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSnapshot {
    pub round: Round,
    pub bets: Vec<Bet>,
}

/// What a single player sees when checking a round's result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerRoundView<'a> {
    /// Round is still open
    Pending,
    /// Round is resolved but the player never bet in it
    NoBet,
    /// Round is resolved and the player had a bet
    Settled { bet: &'a Bet, won: bool },
}

impl RoundSnapshot {
    /// Fetch the round and its bets concurrently. Either call failing fails
    /// the whole snapshot.
    pub async fn fetch<C: GameCoordinator + ?Sized>(coordinator: &C, round: RoundId) -> Result<Self> {
        let (round_data, bets) =
            futures::try_join!(coordinator.fetch_round(round), coordinator.fetch_bets(round))?;

        tracing::debug!(
            round,
            resolved = round_data.resolved,
            bets = bets.len(),
            "Fetched round snapshot"
        );
        Ok(Self {
            round: round_data,
            bets,
        })
    }

    pub fn bet_count(&self) -> usize {
        self.bets.len()
    }

    /// First bet placed by `player`, compared case-insensitively
    pub fn bet_by(&self, player: &str) -> Option<&Bet> {
        self.bets
            .iter()
            .find(|bet| bet.player.eq_ignore_ascii_case(player))
    }

    pub fn player_view(&self, player: &str) -> PlayerRoundView<'_> {
        if !self.round.resolved {
            return PlayerRoundView::Pending;
        }
        match self.bet_by(player) {
            None => PlayerRoundView::NoBet,
            Some(bet) => PlayerRoundView::Settled {
                bet,
                won: self.round.is_winner(player),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::resolution::tests::{bet, round, FakeCoordinator};
    use crate::Error;

    const ALICE: &str = "0x00000000000000000000000000000000000000Aa";

    fn resolved_with_winner(winner: &str) -> Round {
        let mut r = round(9, true);
        r.winners = vec![winner.to_string()];
        r
    }

    #[tokio::test]
    async fn fetch_returns_round_and_bets() {
        let coordinator = FakeCoordinator::default().with_round(
            round(1, false),
            vec![bet(1, ALICE, 10, true), bet(1, "0xbb", 20, false)],
        );

        let snapshot = RoundSnapshot::fetch(&coordinator, 1).await.unwrap();
        assert_eq!(snapshot.round.round, 1);
        assert_eq!(snapshot.bet_count(), 2);
    }

    #[tokio::test]
    async fn fetch_missing_round_is_not_found() {
        let coordinator = FakeCoordinator::default();
        let err = RoundSnapshot::fetch(&coordinator, 3).await.unwrap_err();
        assert!(matches!(err, Error::RoundNotFound(3)));
    }

    #[test]
    fn unresolved_round_is_pending() {
        let snapshot = RoundSnapshot {
            round: round(2, false),
            bets: vec![bet(2, ALICE, 10, true)],
        };
        assert_eq!(snapshot.player_view(ALICE), PlayerRoundView::Pending);
    }

    #[test]
    fn player_without_bet_sees_no_bet() {
        let snapshot = RoundSnapshot {
            round: resolved_with_winner("0xbb"),
            bets: vec![bet(9, "0xbb", 10, true)],
        };
        assert_eq!(snapshot.player_view(ALICE), PlayerRoundView::NoBet);
    }

    #[test]
    fn winner_lookup_ignores_case() {
        let snapshot = RoundSnapshot {
            round: resolved_with_winner(&ALICE.to_uppercase().replace("0X", "0x")),
            bets: vec![bet(9, ALICE, 10, true), bet(9, "0xbb", 10, false)],
        };

        match snapshot.player_view(&ALICE.to_lowercase()) {
            PlayerRoundView::Settled { bet, won } => {
                assert!(won);
                assert!(bet.choice);
            }
            other => panic!("unexpected view: {other:?}"),
        }
        assert!(matches!(
            snapshot.player_view("0xBB"),
            PlayerRoundView::Settled { won: false, .. }
        ));
    }
}

//! Coin-flip game domain: sides, coin tosses, round resolution and round
//! status queries.

pub mod resolution;
pub mod status;

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use resolution::{ResolutionOutcome, ResolutionWorkflow};
pub use status::{PlayerRoundView, RoundSnapshot};

/// Round number as assigned by the game contract / coordinator
pub type RoundId = u64;

/// Fewest bets a round needs before it can be resolved
pub const MIN_BETS_TO_RESOLVE: usize = 2;

/// One side of the coin. On the wire and on-chain `true` means heads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoinSide {
    Heads,
    Tails,
}

impl CoinSide {
    pub fn as_bool(&self) -> bool {
        matches!(self, CoinSide::Heads)
    }

    pub fn label(&self) -> &'static str {
        match self {
            CoinSide::Heads => "Heads",
            CoinSide::Tails => "Tails",
        }
    }
}

impl From<bool> for CoinSide {
    fn from(value: bool) -> Self {
        if value {
            CoinSide::Heads
        } else {
            CoinSide::Tails
        }
    }
}

impl fmt::Display for CoinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Source of coin outcomes
pub trait CoinToss: Send + Sync {
    fn toss(&self) -> CoinSide;
}

/// Fair coin backed by the thread-local RNG; every toss is independent
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCoin;

impl CoinToss for RandomCoin {
    fn toss(&self) -> CoinSide {
        CoinSide::from(rand::thread_rng().gen_bool(0.5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coin_side_bool_mapping() {
        assert_eq!(CoinSide::from(true), CoinSide::Heads);
        assert_eq!(CoinSide::from(false), CoinSide::Tails);
        assert!(CoinSide::Heads.as_bool());
        assert_eq!(CoinSide::Tails.to_string(), "Tails");
    }

    #[test]
    fn random_coin_is_roughly_fair() {
        let coin = RandomCoin;
        let flips = 20_000;
        let heads = (0..flips)
            .filter(|_| coin.toss() == CoinSide::Heads)
            .count();

        // ~7 standard deviations either side of 10_000
        assert!(
            (9_500..=10_500).contains(&heads),
            "heads = {} of {}",
            heads,
            flips
        );
    }
}

//! Free-text bet intent parsing
//!
//! Messages are matched against an ordered keyword table; the first rule
//! whose keywords appear in the lower-cased text decides the intent. Numbers
//! are taken from the first numeric substring, so a message mentioning an
//! unrelated number before the amount picks the wrong one.

use crate::game::{CoinSide, RoundId};
use crate::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Bet amount used when a bet message names none
pub const DEFAULT_BET_AMOUNT: &str = "0.01";

static AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(\.\d+)?").expect("valid amount pattern"));
static ROUND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid round pattern"));

/// Which round a query refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundRef {
    Explicit(RoundId),
    /// The round before the contract's current one
    Previous,
    /// The contract's current round
    Current,
}

impl RoundRef {
    pub fn resolve(&self, current: RoundId) -> RoundId {
        match self {
            RoundRef::Explicit(round) => *round,
            RoundRef::Previous => current.saturating_sub(1),
            RoundRef::Current => current,
        }
    }

    pub fn needs_current_round(&self) -> bool {
        !matches!(self, RoundRef::Explicit(_))
    }
}

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BetIntent {
    Balance,
    RandomBet,
    PlaceBet { amount: String, side: CoinSide },
    CheckResult { round: RoundRef },
    ShowRound { round: RoundRef },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentKind {
    Balance,
    RandomBet,
    PlaceBet,
    CheckResult,
    ShowRound,
}

/// A keyword rule; matches when any keyword is a substring of the message
#[derive(Debug)]
pub struct IntentRule {
    pub kind: IntentKind,
    pub keywords: &'static [&'static str],
}

impl IntentRule {
    pub fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|k| text.contains(k))
    }
}

/// Rules in priority order
pub const RULES: &[IntentRule] = &[
    IntentRule {
        kind: IntentKind::Balance,
        keywords: &["balance"],
    },
    IntentRule {
        kind: IntentKind::RandomBet,
        keywords: &["pick something", "pick for me", "random bet"],
    },
    IntentRule {
        kind: IntentKind::PlaceBet,
        keywords: &["bet"],
    },
    IntentRule {
        kind: IntentKind::CheckResult,
        keywords: &["did i win", "check result"],
    },
    IntentRule {
        kind: IntentKind::ShowRound,
        keywords: &["show round"],
    },
];

/// First rule matching the lower-cased text
pub fn classify(text: &str) -> Option<IntentKind> {
    let text = text.to_lowercase();
    RULES.iter().find(|rule| rule.matches(&text)).map(|r| r.kind)
}

/// First run of digits as a round, or `fallback` when there is none
fn round_ref(text: &str, fallback: RoundRef) -> Result<RoundRef> {
    match ROUND_RE.find(text) {
        None => Ok(fallback),
        Some(m) => m
            .as_str()
            .parse()
            .map(RoundRef::Explicit)
            .map_err(|_| Error::InvalidArgument(format!("Invalid round number: {}", m.as_str()))),
    }
}

/// Parse a free-text message into a [`BetIntent`]
pub fn parse_intent(text: &str) -> Result<BetIntent> {
    parse_intent_with_default(text, DEFAULT_BET_AMOUNT)
}

/// Like [`parse_intent`], with a caller supplied amount for bets naming none
pub fn parse_intent_with_default(text: &str, default_amount: &str) -> Result<BetIntent> {
    let text = text.to_lowercase();
    let kind = classify(&text).ok_or(Error::UnknownIntent)?;

    let intent = match kind {
        IntentKind::Balance => BetIntent::Balance,
        IntentKind::RandomBet => BetIntent::RandomBet,
        IntentKind::PlaceBet => {
            let amount = AMOUNT_RE
                .find(&text)
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| default_amount.to_string());
            let side = CoinSide::from(text.contains("heads"));
            BetIntent::PlaceBet { amount, side }
        }
        IntentKind::CheckResult => BetIntent::CheckResult {
            round: round_ref(&text, RoundRef::Previous)?,
        },
        IntentKind::ShowRound => BetIntent::ShowRound {
            round: round_ref(&text, RoundRef::Current)?,
        },
    };

    tracing::debug!(?intent, "Parsed bet intent");
    Ok(intent)
}

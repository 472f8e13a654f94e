//! Coordinator payloads
//!
//! The coordinator serializes big integers as decimal strings and sometimes
//! sends `winners` as a JSON-encoded string instead of an array. Both are
//! normalized here so the rest of the crate only sees typed values.

use crate::game::RoundId;
use alloy::primitives::U256;
use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// A game round as stored by the coordinator
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    #[serde(default, deserialize_with = "de_string_id")]
    pub id: String,
    #[serde(deserialize_with = "de_round_id")]
    pub round: RoundId,
    pub resolved: bool,
    #[serde(default)]
    pub result: Option<bool>,
    #[serde(default, deserialize_with = "de_winners")]
    pub winners: Vec<String>,
    #[serde(default, deserialize_with = "de_amount")]
    pub total_bets: U256,
    #[serde(default, deserialize_with = "de_amount")]
    pub house_fee: U256,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Round {
    /// Case-insensitive membership test against the winners list
    pub fn is_winner(&self, player: &str) -> bool {
        self.winners.iter().any(|w| w.eq_ignore_ascii_case(player))
    }
}

/// A single bet; immutable once the coordinator has recorded it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bet {
    #[serde(default, deserialize_with = "de_string_id")]
    pub id: String,
    pub player: String,
    #[serde(deserialize_with = "de_amount")]
    pub amount: U256,
    pub choice: bool,
    #[serde(deserialize_with = "de_round_id")]
    pub round: RoundId,
    #[serde(default)]
    pub is_token: bool,
    #[serde(default)]
    pub token: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /resolve`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolveRequest {
    pub round: RoundId,
    pub result: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    String(String),
}

fn de_round_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RoundId, D::Error> {
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s
            .trim()
            .parse()
            .map_err(|e| D::Error::custom(format!("invalid round number '{}': {}", s, e))),
    }
}

fn de_string_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<NumberOrString>::deserialize(deserializer)? {
        Some(NumberOrString::Number(n)) => n.to_string(),
        Some(NumberOrString::String(s)) => s,
        None => String::new(),
    })
}

fn de_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(U256::ZERO),
        Some(NumberOrString::Number(n)) => Ok(U256::from(n)),
        Some(NumberOrString::String(s)) => U256::from_str(s.trim())
            .map_err(|e| D::Error::custom(format!("invalid amount '{}': {}", s, e))),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawWinners {
    List(Vec<String>),
    Encoded(String),
}

fn de_winners<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    match Option::<RawWinners>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(RawWinners::List(list)) => Ok(list),
        Some(RawWinners::Encoded(s)) if s.trim().is_empty() => Ok(Vec::new()),
        Some(RawWinners::Encoded(s)) => serde_json::from_str::<Option<Vec<String>>>(&s)
            .map(Option::unwrap_or_default)
            .map_err(|e| D::Error::custom(format!("invalid winners payload: {}", e))),
    }
}

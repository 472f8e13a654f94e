//! User-facing response texts
//!
//! Everything here is pure; the same inputs always render the same bytes.

use crate::config::Network;
use crate::coordinator::Bet;
use crate::game::{CoinSide, ResolutionOutcome, RoundId, RoundSnapshot};
use crate::relay::TaskId;
use crate::units::format_ether;
use alloy::primitives::{Address, U256};
use chrono::{DateTime, Utc};
use std::fmt::Display;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn timestamp(at: &DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

// Round resolution

pub fn resolved(round: RoundId, side: CoinSide) -> String {
    format!("✅ Round {} resolved.\n🎲 Result: {}", round, side)
}

pub fn already_resolved(round: RoundId) -> String {
    format!(
        "⚠️ Round {} has already been resolved. No action needed.",
        round
    )
}

pub fn insufficient_bets(round: RoundId, required: usize) -> String {
    format!(
        "⚠️ Round {} requires at least {} bets to resolve.",
        round, required
    )
}

pub fn round_not_found(round: RoundId) -> String {
    format!("❌ Round {} not found or not yet created", round)
}

pub fn resolution_outcome(outcome: &ResolutionOutcome) -> String {
    match outcome {
        ResolutionOutcome::NotFound(round) => round_not_found(*round),
        ResolutionOutcome::AlreadyResolved(round) => already_resolved(*round),
        ResolutionOutcome::InsufficientBets {
            round, required, ..
        } => insufficient_bets(*round, *required),
        ResolutionOutcome::Resolved { round, side } => resolved(*round, *side),
    }
}

/// Tracker view of a round
pub fn round_status(snapshot: &RoundSnapshot) -> String {
    let round = &snapshot.round;
    let mut text = format!(
        "🎲 Round {} Status:\n- Bets: {}\n- Resolved: {}",
        round.round,
        snapshot.bet_count(),
        if round.resolved { "✅ Yes" } else { "❌ No" }
    );
    if round.resolved {
        if let Some(result) = round.result {
            text.push_str(&format!("\n- Result: 🎲 {}", CoinSide::from(result)));
        }
    }
    text.push_str(&format!("\n- Created: {}", timestamp(&round.created_at)));
    if round.resolved {
        text.push_str(&format!(
            "\n- Resolved At: {}",
            timestamp(&round.updated_at)
        ));
    }
    text
}

// Player-facing game texts

pub fn player_round_not_found(round: RoundId) -> String {
    format!("❌ Round {} not found.", round)
}

pub fn game_balance(wei: U256) -> String {
    format!("💰 Your balance: {} ETH", format_ether(wei))
}

pub fn bet_placed(amount: &str, side: CoinSide, task: &TaskId, status_url: &str) -> String {
    format!(
        "✅ Bet placed!\n- Amount: {} ETH\n- Choice: {}\n- Task ID: {}\n- [Track Status]({})",
        amount, side, task, status_url
    )
}

pub fn pending_round(snapshot: &RoundSnapshot) -> String {
    let round = &snapshot.round;
    format!(
        "⏳ Round {} Status:\n- Total Bets: {} ETH\n- Number of Bets: {}\n- Status: Waiting for resolution\n- Created: {}",
        round.round,
        format_ether(round.total_bets),
        snapshot.bet_count(),
        timestamp(&round.created_at)
    )
}

pub fn no_bet(round: RoundId) -> String {
    format!("❌ You didn't place any bets in round {}.", round)
}

/// Settled round from one player's point of view
pub fn round_result(snapshot: &RoundSnapshot, bet: &Bet, won: bool) -> String {
    let round = &snapshot.round;
    format!(
        "🎲 Round {} Result:\nYour bet: {} for {} ETH\nResult: {}\n{}\nTotal Bets: {} ETH\nHouse Fee: {} ETH\nNumber of Winners: {}\nResolved at: {}",
        round.round,
        CoinSide::from(bet.choice),
        format_ether(bet.amount),
        CoinSide::from(round.result.unwrap_or(false)),
        if won {
            "🎉 Congratulations! You won!"
        } else {
            "😔 Sorry, you lost this time."
        },
        format_ether(round.total_bets),
        format_ether(round.house_fee),
        round.winners.len(),
        timestamp(&round.updated_at)
    )
}

pub fn round_information(snapshot: &RoundSnapshot) -> String {
    let round = &snapshot.round;
    let mut text = format!(
        "🎲 Round {} Information:\nStatus: {}\nTotal Bets: {} ETH\nNumber of Players: {}\n",
        round.round,
        if round.resolved {
            "✅ Resolved"
        } else {
            "⏳ Active"
        },
        format_ether(round.total_bets),
        snapshot.bet_count()
    );
    if round.resolved {
        text.push_str(&format!(
            "Result: 🎲 {}\nHouse Fee: {} ETH\nWinners: {}\n",
            CoinSide::from(round.result.unwrap_or(false)),
            format_ether(round.house_fee),
            round.winners.len()
        ));
    }
    text.push_str(&format!("Created: {}", timestamp(&round.created_at)));
    if round.resolved {
        text.push_str(&format!("\nResolved: {}", timestamp(&round.updated_at)));
    }
    text
}

// Wallet and relay

pub fn wallet_balance(network: Network, wei: U256, address: Address) -> String {
    format!(
        "💰 Wallet balance on **{}**: {} {}\n📍 Address: {}",
        network.key(),
        format_ether(wei),
        network.native_symbol(),
        address
    )
}

pub fn contract_call_success(task: &TaskId) -> String {
    format!("✅ Contract interaction successful! Task ID: {}", task)
}

// Errors

pub fn resolve_error(err: impl Display) -> String {
    format!("❌ Error resolving round: {}", err)
}

pub fn game_state_error(err: impl Display) -> String {
    format!("❌ Error fetching game state: {}", err)
}

pub fn game_error(err: impl Display) -> String {
    format!("❌ Error: {}", err)
}

pub fn contract_call_error(err: impl Display) -> String {
    format!("❌ Error in contract interaction: {}", err)
}

pub fn wallet_balance_error(err: impl Display) -> String {
    format!("❌ Error fetching wallet balance: {}", err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::resolution::tests::{bet, round};
    use crate::Error;
    use chrono::TimeZone;

    fn resolved_snapshot() -> RoundSnapshot {
        let mut r = round(7, true);
        r.result = Some(true);
        r.winners = vec!["0xaa".to_string()];
        r.total_bets = U256::from(150_000_000_000_000_000u128);
        r.house_fee = U256::from(3_000_000_000_000_000u128);
        r.updated_at = Utc.with_ymd_and_hms(2024, 2, 19, 7, 10, 0).unwrap();
        RoundSnapshot {
            round: r,
            bets: vec![
                bet(7, "0xaa", 100_000_000_000_000_000, true),
                bet(7, "0xbb", 50_000_000_000_000_000, false),
            ],
        }
    }

    fn open_snapshot() -> RoundSnapshot {
        let mut r = round(8, false);
        r.total_bets = U256::from(50_000_000_000_000_000u128);
        RoundSnapshot {
            round: r,
            bets: vec![bet(8, "0xaa", 50_000_000_000_000_000, true)],
        }
    }

    #[test]
    fn resolution_texts() {
        assert_eq!(
            resolved(1, CoinSide::Heads),
            "✅ Round 1 resolved.\n🎲 Result: Heads"
        );
        assert_eq!(
            resolution_outcome(&ResolutionOutcome::InsufficientBets {
                round: 2,
                count: 1,
                required: 2
            }),
            "⚠️ Round 2 requires at least 2 bets to resolve."
        );
        assert_eq!(
            resolution_outcome(&ResolutionOutcome::AlreadyResolved(3)),
            "⚠️ Round 3 has already been resolved. No action needed."
        );
        assert_eq!(
            resolution_outcome(&ResolutionOutcome::NotFound(4)),
            "❌ Round 4 not found or not yet created"
        );
    }

    #[test]
    fn open_round_status() {
        assert_eq!(
            round_status(&open_snapshot()),
            "🎲 Round 8 Status:\n- Bets: 1\n- Resolved: ❌ No\n- Created: 2024-02-19 06:56:56"
        );
    }

    #[test]
    fn resolved_round_status() {
        assert_eq!(
            round_status(&resolved_snapshot()),
            "🎲 Round 7 Status:\n- Bets: 2\n- Resolved: ✅ Yes\n- Result: 🎲 Heads\n- Created: 2024-02-19 06:56:56\n- Resolved At: 2024-02-19 07:10:00"
        );
    }

    #[test]
    fn resolved_without_result_omits_result_line() {
        let mut snapshot = resolved_snapshot();
        snapshot.round.result = None;
        assert!(!round_status(&snapshot).contains("- Result:"));
    }

    #[test]
    fn pending_round_text() {
        assert_eq!(
            pending_round(&open_snapshot()),
            "⏳ Round 8 Status:\n- Total Bets: 0.05 ETH\n- Number of Bets: 1\n- Status: Waiting for resolution\n- Created: 2024-02-19 06:56:56"
        );
    }

    #[test]
    fn round_result_text() {
        let snapshot = resolved_snapshot();
        let text = round_result(&snapshot, &snapshot.bets[0], true);
        assert_eq!(
            text,
            "🎲 Round 7 Result:\nYour bet: Heads for 0.1 ETH\nResult: Heads\n🎉 Congratulations! You won!\nTotal Bets: 0.15 ETH\nHouse Fee: 0.003 ETH\nNumber of Winners: 1\nResolved at: 2024-02-19 07:10:00"
        );
        let text = round_result(&snapshot, &snapshot.bets[1], false);
        assert!(text.contains("Your bet: Tails for 0.05 ETH"));
        assert!(text.contains("😔 Sorry, you lost this time."));
    }

    #[test]
    fn round_information_text() {
        assert_eq!(
            round_information(&open_snapshot()),
            "🎲 Round 8 Information:\nStatus: ⏳ Active\nTotal Bets: 0.05 ETH\nNumber of Players: 1\nCreated: 2024-02-19 06:56:56"
        );
        assert_eq!(
            round_information(&resolved_snapshot()),
            "🎲 Round 7 Information:\nStatus: ✅ Resolved\nTotal Bets: 0.15 ETH\nNumber of Players: 2\nResult: 🎲 Heads\nHouse Fee: 0.003 ETH\nWinners: 1\nCreated: 2024-02-19 06:56:56\nResolved: 2024-02-19 07:10:00"
        );
    }

    #[test]
    fn bet_and_balance_texts() {
        let task = TaskId("0xtask".to_string());
        assert_eq!(
            bet_placed(
                "0.05",
                CoinSide::Heads,
                &task,
                &task.status_url("https://relay.gelato.digital/tasks/status")
            ),
            "✅ Bet placed!\n- Amount: 0.05 ETH\n- Choice: Heads\n- Task ID: 0xtask\n- [Track Status](https://relay.gelato.digital/tasks/status/0xtask)"
        );
        assert_eq!(
            game_balance(U256::from(250_000_000_000_000_000u128)),
            "💰 Your balance: 0.25 ETH"
        );
        assert_eq!(no_bet(5), "❌ You didn't place any bets in round 5.");
        assert_eq!(player_round_not_found(5), "❌ Round 5 not found.");
        assert_eq!(
            contract_call_success(&task),
            "✅ Contract interaction successful! Task ID: 0xtask"
        );
    }

    #[test]
    fn wallet_balance_text() {
        assert_eq!(
            wallet_balance(
                Network::InkSepolia,
                U256::from(1_500_000_000_000_000_000u128),
                Address::ZERO
            ),
            "💰 Wallet balance on **inkSepolia**: 1.5 ETH\n📍 Address: 0x0000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn error_texts_carry_cause() {
        let err = Error::Coordinator {
            status: 500,
            body: "db down".to_string(),
        };
        assert_eq!(
            resolve_error(&err),
            "❌ Error resolving round: Coordinator returned 500: db down"
        );
        assert_eq!(
            game_error(Error::UnknownIntent),
            "❌ Error: Please specify an action: bet (heads/tails), show round, or check result"
        );
        assert!(game_state_error("timeout").starts_with("❌ Error fetching game state: "));
        assert!(contract_call_error("x").starts_with("❌ Error in contract interaction: "));
        assert!(wallet_balance_error("x").starts_with("❌ Error fetching wallet balance: "));
    }
}

use super::{
    relay_not_configured, respond, Action, ActionCallback, ActionExample, Content, Message,
};
use crate::chain::{coin_flip_abi, CoinFlipReader};
use crate::config::{Config, GameConfig};
use crate::coordinator::GameCoordinator;
use crate::format;
use crate::game::{CoinSide, CoinToss, PlayerRoundView, RandomCoin, RoundId, RoundSnapshot};
use crate::intent::{parse_intent_with_default, BetIntent, RoundRef};
use crate::relay::{ContractCall, ContractCallExecutor, RelayService};
use crate::units::ether_to_wei;
use crate::wallet::AgentWallet;
use crate::{Error, Result};
use async_trait::async_trait;
use rand::Rng;
use serde_json::json;
use std::sync::Arc;

const EXAMPLES: &[ActionExample] = &[
    ActionExample {
        input: "bet 0.05 ETH on heads",
        output: "✅ Bet placed!\n- Amount: 0.05 ETH\n- Choice: Heads\n- Task ID: 0x...\n- [Track Status](https://relay.gelato.digital/tasks/status/0x...)",
    },
    ActionExample {
        input: "show round 42",
        output: "🎲 Round 42 Information:\nStatus: ⏳ Active\nTotal Bets: 0.1 ETH\nNumber of Players: 3",
    },
    ActionExample {
        input: "Did I win?",
        output: "🎲 Round 42 Result:\nYour bet: Heads for 2.5 ETH\nResult: Heads\n🎉 Congratulations! You won!",
    },
    ActionExample {
        input: "Pick something for me",
        output: "✅ Bet placed!\n- Amount: 0.027 ETH\n- Choice: Tails\n- Task ID: 0x...",
    },
    ActionExample {
        input: "what's my balance?",
        output: "💰 Your balance: 0.25 ETH",
    },
];

/// Uniform bet amount in `[min, max)` with three decimals
pub(crate) fn random_bet_amount(min_eth: f64, max_eth: f64) -> String {
    let lo = (min_eth * 1000.0).round() as u64;
    let hi = ((max_eth * 1000.0).round() as u64).max(lo + 1);
    let milli = rand::thread_rng().gen_range(lo..hi);
    format!("{}.{:03}", milli / 1000, milli % 1000)
}

/// Free-text front end to the coin-flip game
pub struct UserFriendlyAction {
    game: GameConfig,
    default_bet: String,
    status_url: String,
    coordinator: Arc<dyn GameCoordinator>,
    reader: Arc<dyn CoinFlipReader>,
    executor: Option<Arc<ContractCallExecutor<Arc<dyn RelayService>>>>,
    wallet: AgentWallet,
    coin: Arc<dyn CoinToss>,
}

impl UserFriendlyAction {
    pub fn new(
        config: Config,
        coordinator: Arc<dyn GameCoordinator>,
        reader: Arc<dyn CoinFlipReader>,
        executor: Option<Arc<ContractCallExecutor<Arc<dyn RelayService>>>>,
        wallet: AgentWallet,
    ) -> Self {
        Self {
            default_bet: config.game.default_bet_eth.clone(),
            game: config.game,
            status_url: config.relay.status_url,
            coordinator,
            reader,
            executor,
            wallet,
            coin: Arc::new(RandomCoin),
        }
    }

    /// Replace the coin used for bets picked on the user's behalf
    pub fn with_coin(mut self, coin: Arc<dyn CoinToss>) -> Self {
        self.coin = coin;
        self
    }

    async fn run(&self, text: &str) -> Result<String> {
        tracing::debug!(input = %text, "Processing user input");
        let intent = parse_intent_with_default(text, &self.default_bet)?;

        match intent {
            BetIntent::Balance => {
                let balance = self.reader.eth_balance(self.wallet.address()).await?;
                Ok(format::game_balance(balance))
            }
            BetIntent::RandomBet => {
                let side = self.coin.toss();
                let amount =
                    random_bet_amount(self.game.random_bet_min_eth, self.game.random_bet_max_eth);
                tracing::info!(amount = %amount, side = %side, "Picked a random bet");
                self.place_bet(&amount, side).await
            }
            BetIntent::PlaceBet { amount, side } => self.place_bet(&amount, side).await,
            BetIntent::CheckResult { round } => {
                let round = self.resolve_round(round).await?;
                self.with_snapshot(round, |snapshot| {
                    let player = self.wallet.address_string();
                    match snapshot.player_view(&player) {
                        PlayerRoundView::Pending => format::pending_round(snapshot),
                        PlayerRoundView::NoBet => format::no_bet(round),
                        PlayerRoundView::Settled { bet, won } => {
                            format::round_result(snapshot, bet, won)
                        }
                    }
                })
                .await
            }
            BetIntent::ShowRound { round } => {
                let round = self.resolve_round(round).await?;
                self.with_snapshot(round, format::round_information).await
            }
        }
    }

    async fn resolve_round(&self, round: RoundRef) -> Result<RoundId> {
        if !round.needs_current_round() {
            return Ok(round.resolve(0));
        }
        let current = self.reader.current_round().await?;
        Ok(round.resolve(current))
    }

    /// Fetch a round snapshot and render it; a missing round renders as not found
    async fn with_snapshot<F>(&self, round: RoundId, render: F) -> Result<String>
    where
        F: FnOnce(&RoundSnapshot) -> String + Send,
    {
        match RoundSnapshot::fetch(self.coordinator.as_ref(), round).await {
            Ok(snapshot) => Ok(render(&snapshot)),
            Err(e) if e.is_not_found() => Ok(format::player_round_not_found(round)),
            Err(e) => Err(e),
        }
    }

    async fn place_bet(&self, amount: &str, side: CoinSide) -> Result<String> {
        let executor = self.executor.as_ref().ok_or_else(relay_not_configured)?;
        let wei = ether_to_wei(amount)?;

        let balance = self.reader.eth_balance(self.wallet.address()).await?;
        if balance < wei {
            return Err(Error::InsufficientBalance {
                required: amount.to_string(),
            });
        }

        let call = ContractCall {
            abi: coin_flip_abi(),
            function_name: "placeBet".to_string(),
            args: vec![json!(side.as_bool()), json!(wei.to_string())],
            target: self.game.contract_address.to_checksum(None),
            chain: self.game.network,
        };
        let task = executor.execute(&call).await?;

        tracing::info!(amount = %amount, side = %side, task_id = %task, "Bet placed");
        Ok(format::bet_placed(
            amount,
            side,
            &task,
            &task.status_url(&self.status_url),
        ))
    }
}

#[async_trait]
impl Action for UserFriendlyAction {
    fn name(&self) -> &'static str {
        "USER_FRIENDLY_CONTRACT_INTERACTION"
    }

    fn similes(&self) -> &[&'static str] {
        &[
            "COIN_FLIP_BET",
            "GAME_BET_CHECK",
            "BET_RESULT_CHECK",
            "USER_BET_STATUS",
            "COIN_FLIP_RESULT",
            "DEPOSIT_ETH",
            "WITHDRAW_ETH",
            "CHECK_BALANCE",
        ]
    }

    fn description(&self) -> &'static str {
        "Handle user betting interactions and result checking for the CoinFlip game. Primary interface for all game-related user queries."
    }

    fn examples(&self) -> &[ActionExample] {
        EXAMPLES
    }

    fn validate(&self) -> Result<()> {
        self.executor.as_ref().map(|_| ()).ok_or_else(relay_not_configured)
    }

    async fn handle(&self, message: &Message, callback: Option<&ActionCallback>) -> String {
        let text = match self.run(&message.text).await {
            Ok(text) => text,
            Err(e) if e.is_precondition() => {
                tracing::warn!(error = %e, "Game request rejected");
                format::game_error(&e)
            }
            Err(e) => {
                tracing::error!(error = %e, "Game interaction failed");
                format::game_error(&e)
            }
        };
        respond(callback, Content::text(text))
    }
}

use super::{respond, Action, ActionCallback, ActionExample, Content, Message, RoundRequest};
use crate::coordinator::GameCoordinator;
use crate::format;
use crate::game::{CoinToss, RandomCoin, ResolutionWorkflow};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

const EXAMPLES: &[ActionExample] = &[ActionExample {
    input: r#"{"round": "1"}"#,
    output: "✅ Round 1 resolved.\n🎲 Result: Heads",
}];

/// Flips a coin and resolves the round with the coordinator
pub struct FlipCoinAction<T = RandomCoin> {
    workflow: ResolutionWorkflow<Arc<dyn GameCoordinator>, T>,
}

impl FlipCoinAction<RandomCoin> {
    pub fn new(coordinator: Arc<dyn GameCoordinator>) -> Self {
        Self::with_coin(coordinator, RandomCoin)
    }
}

impl<T: CoinToss> FlipCoinAction<T> {
    pub fn with_coin(coordinator: Arc<dyn GameCoordinator>, coin: T) -> Self {
        Self {
            workflow: ResolutionWorkflow::new(coordinator, coin),
        }
    }

    pub fn with_min_bets(self, min_bets: usize) -> Self {
        Self {
            workflow: self.workflow.with_min_bets(min_bets),
        }
    }
}

#[async_trait]
impl<T: CoinToss + 'static> Action for FlipCoinAction<T> {
    fn name(&self) -> &'static str {
        "FLIP_COIN"
    }

    fn similes(&self) -> &[&'static str] {
        &["TOSS_COIN", "FLIP", "COIN_TOSS", "RESOLVE_ROUND"]
    }

    fn description(&self) -> &'static str {
        "Flips a coin and resolves the round by submitting the result to the Game Coordinator."
    }

    fn examples(&self) -> &[ActionExample] {
        EXAMPLES
    }

    fn input_schema(&self) -> Option<Value> {
        Some(RoundRequest::schema())
    }

    async fn handle(&self, message: &Message, callback: Option<&ActionCallback>) -> String {
        tracing::info!(request = %message.text, "Received flip request");

        let text = match RoundRequest::parse(&message.text) {
            Ok(round) => match self.workflow.resolve(round).await {
                Ok(outcome) => format::resolution_outcome(&outcome),
                Err(e) => {
                    tracing::error!(round, error = %e, "Error resolving round");
                    format::resolve_error(&e)
                }
            },
            Err(e) => {
                tracing::error!(error = %e, "Invalid flip request");
                format::resolve_error(&e)
            }
        };

        respond(callback, Content::text(text))
    }
}

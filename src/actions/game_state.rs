use super::{respond, Action, ActionCallback, ActionExample, Content, Message, RoundRequest};
use crate::coordinator::GameCoordinator;
use crate::format;
use crate::game::RoundSnapshot;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

const EXAMPLES: &[ActionExample] = &[ActionExample {
    input: r#"{"round": "1"}"#,
    output: "🎲 Round 1 Status:\n- Bets: 2\n- Resolved: ❌ No\n- Created: 2024-02-19 06:56:56",
}];

/// Reports the state of a round from the coordinator
pub struct CheckGameStateAction {
    coordinator: Arc<dyn GameCoordinator>,
}

impl CheckGameStateAction {
    pub fn new(coordinator: Arc<dyn GameCoordinator>) -> Self {
        Self { coordinator }
    }
}

#[async_trait]
impl Action for CheckGameStateAction {
    fn name(&self) -> &'static str {
        "CHECK_GAME_STATE"
    }

    fn similes(&self) -> &[&'static str] {
        &["CHECK_ROUND", "GAME_STATUS", "ROUND_STATUS"]
    }

    fn description(&self) -> &'static str {
        "Fetches the current state of a game round from the Game Coordinator backend."
    }

    fn examples(&self) -> &[ActionExample] {
        EXAMPLES
    }

    fn input_schema(&self) -> Option<Value> {
        Some(RoundRequest::schema())
    }

    async fn handle(&self, message: &Message, callback: Option<&ActionCallback>) -> String {
        tracing::info!(request = %message.text, "Received game state request");

        let round = match RoundRequest::parse(&message.text) {
            Ok(round) => round,
            Err(e) => {
                tracing::error!(error = %e, "Invalid game state request");
                return respond(callback, Content::text(format::game_state_error(&e)));
            }
        };

        let text = match RoundSnapshot::fetch(self.coordinator.as_ref(), round).await {
            Ok(snapshot) => {
                tracing::info!(round, bets = snapshot.bet_count(), "Fetched game state");
                format::round_status(&snapshot)
            }
            Err(e) if e.is_not_found() => {
                tracing::error!(round, "Round not found or not yet created");
                format::round_not_found(round)
            }
            Err(e) => {
                tracing::error!(round, error = %e, "Error fetching game state");
                format::game_state_error(&e)
            }
        };

        respond(callback, Content::text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::resolution::tests::{bet, round, FakeCoordinator};

    #[tokio::test]
    async fn reports_open_round() {
        let coordinator = Arc::new(FakeCoordinator::default().with_round(
            round(1, false),
            vec![bet(1, "0xa", 10, true), bet(1, "0xb", 10, false)],
        ));
        let action = CheckGameStateAction::new(coordinator);

        assert_eq!(
            action.handle(&Message::text(r#"{"round": "1"}"#), None).await,
            "🎲 Round 1 Status:\n- Bets: 2\n- Resolved: ❌ No\n- Created: 2024-02-19 06:56:56"
        );
    }

    #[tokio::test]
    async fn repeated_queries_render_identically() {
        let mut settled = round(2, true);
        settled.winners = vec!["0xa".to_string()];
        let coordinator = Arc::new(FakeCoordinator::default().with_round(
            settled,
            vec![bet(2, "0xa", 10, true), bet(2, "0xb", 10, false)],
        ));
        let action = CheckGameStateAction::new(coordinator);
        let message = Message::text(r#"{"round": 2}"#);

        let first = action.handle(&message, None).await;
        for _ in 0..5 {
            assert_eq!(action.handle(&message, None).await, first);
        }
        assert!(first.contains("- Resolved At: 2024-02-19 06:56:56"));
    }

    #[tokio::test]
    async fn missing_round_is_not_found_text() {
        let action = CheckGameStateAction::new(Arc::new(FakeCoordinator::default()));
        assert_eq!(
            action.handle(&Message::text(r#"{"round": 4}"#), None).await,
            "❌ Round 4 not found or not yet created"
        );
    }

    #[tokio::test]
    async fn bad_request_is_error_text() {
        let action = CheckGameStateAction::new(Arc::new(FakeCoordinator::default()));
        let text = action.handle(&Message::text("status please"), None).await;
        assert!(text.starts_with("❌ Error fetching game state: "), "{}", text);
    }
}

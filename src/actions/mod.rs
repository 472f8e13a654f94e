//! Chat actions and the plugins that group them
//!
//! Every action turns a message into a single response text. The text is
//! passed to the callback (when one is given) and returned; failures are
//! rendered into the text and never escape the handler.

mod contract_interaction;
mod flip_coin;
mod game_state;
mod user_friendly;
mod wallet_balance;

pub use contract_interaction::{ContractInteractionAction, ContractInteractionInput};
pub use flip_coin::FlipCoinAction;
pub use game_state::CheckGameStateAction;
pub use user_friendly::UserFriendlyAction;
pub use wallet_balance::WalletBalanceAction;

use crate::chain::CoinFlipReader;
use crate::config::Config;
use crate::coordinator::GameCoordinator;
use crate::game::RoundId;
use crate::relay::{ContractCallExecutor, RelayService};
use crate::wallet::AgentWallet;
use crate::{Error, Result};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Incoming message: free text plus optional structured content
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    #[serde(default)]
    pub content: Value,
}

impl Message {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            content: Value::Null,
        }
    }

    pub fn with_content(text: impl Into<String>, content: Value) -> Self {
        Self {
            text: text.into(),
            content,
        }
    }
}

/// Response handed to the callback
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Content {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            data: None,
        }
    }
}

/// Callback type for action responses
pub type ActionCallback = dyn Fn(&Content) + Send + Sync;

/// Sample exchange used for routing and help texts
#[derive(Debug, Clone, Copy)]
pub struct ActionExample {
    pub input: &'static str,
    pub output: &'static str,
}

#[async_trait]
pub trait Action: Send + Sync {
    fn name(&self) -> &'static str;

    /// Alternative names the action answers to
    fn similes(&self) -> &[&'static str];

    fn description(&self) -> &'static str;

    fn examples(&self) -> &[ActionExample] {
        &[]
    }

    /// JSON schema of structured input, for actions that take any
    fn input_schema(&self) -> Option<Value> {
        None
    }

    /// Whether the action is usable with the current configuration
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    async fn handle(&self, message: &Message, callback: Option<&ActionCallback>) -> String;
}

/// Deliver `content` through the callback and return its text
pub(crate) fn respond(callback: Option<&ActionCallback>, content: Content) -> String {
    if let Some(callback) = callback {
        callback(&content);
    }
    content.text
}

/// `{"round": "<n>"}` or `{"round": n}`
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RoundRequest {
    pub round: RoundArg,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RoundArg {
    Number(RoundId),
    Text(String),
}

impl RoundRequest {
    pub fn parse(text: &str) -> Result<RoundId> {
        let request: RoundRequest = serde_json::from_str(text)?;
        match request.round {
            RoundArg::Number(n) => Ok(n),
            RoundArg::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| Error::InvalidArgument(format!("Invalid round number: {}", s))),
        }
    }

    pub fn schema() -> Value {
        schemars::schema_for!(RoundRequest).into()
    }
}

/// A named group of actions
pub struct Plugin {
    pub name: &'static str,
    pub description: &'static str,
    actions: Vec<Arc<dyn Action>>,
}

impl Plugin {
    pub fn new(
        name: &'static str,
        description: &'static str,
        actions: Vec<Arc<dyn Action>>,
    ) -> Self {
        Self {
            name,
            description,
            actions,
        }
    }

    pub fn actions(&self) -> &[Arc<dyn Action>] {
        &self.actions
    }

    /// Look up an action by name or simile, ignoring case
    pub fn find(&self, name: &str) -> Option<&Arc<dyn Action>> {
        self.actions.iter().find(|action| {
            action.name().eq_ignore_ascii_case(name)
                || action.similes().iter().any(|s| s.eq_ignore_ascii_case(name))
        })
    }

    /// Route a message to the named action
    pub async fn dispatch(
        &self,
        name: &str,
        message: &Message,
        callback: Option<&ActionCallback>,
    ) -> Result<String> {
        let action = self
            .find(name)
            .ok_or_else(|| Error::InvalidArgument(format!("Unknown action: {}", name)))?;
        action.validate()?;

        tracing::debug!(plugin = self.name, action = action.name(), "Dispatching action");
        Ok(action.handle(message, callback).await)
    }
}

/// FLIP_COIN and CHECK_GAME_STATE
pub fn game_tracker_plugin(coordinator: Arc<dyn GameCoordinator>, min_bets: usize) -> Plugin {
    Plugin::new(
        "game-tracker",
        "Resolves coin-flip rounds and reports their state",
        vec![
            Arc::new(FlipCoinAction::new(coordinator.clone()).with_min_bets(min_bets)),
            Arc::new(CheckGameStateAction::new(coordinator)),
        ],
    )
}

/// Collaborators of the relay plugin
pub struct RelayDeps {
    pub config: Config,
    /// Only the game front end reads rounds; `None` leaves it out
    pub coordinator: Option<Arc<dyn GameCoordinator>>,
    pub reader: Arc<dyn CoinFlipReader>,
    /// `None` when no sponsor key is configured
    pub relay: Option<Arc<dyn RelayService>>,
    pub wallet: AgentWallet,
}

/// CONTRACT_INTERACTION, GET_WALLET_BALANCE and USER_FRIENDLY_CONTRACT_INTERACTION
pub fn relay_plugin(deps: RelayDeps) -> Plugin {
    let executor = deps
        .relay
        .map(|relay| Arc::new(ContractCallExecutor::new(relay)));

    let mut actions: Vec<Arc<dyn Action>> = vec![
        Arc::new(ContractInteractionAction::new(executor.clone())),
        Arc::new(WalletBalanceAction::new(
            deps.reader.clone(),
            deps.wallet,
            deps.config.game.network,
        )),
    ];
    if let Some(coordinator) = deps.coordinator {
        actions.push(Arc::new(UserFriendlyAction::new(
            deps.config,
            coordinator,
            deps.reader,
            executor,
            deps.wallet,
        )));
    }

    Plugin::new(
        "relay",
        "Relays coin-flip game transactions gaslessly",
        actions,
    )
}

/// Error used by relay actions when no sponsor key is configured
pub(crate) fn relay_not_configured() -> Error {
    Error::Config(format!(
        "{} is not configured.",
        crate::config::RELAY_API_KEY_ENV
    ))
}

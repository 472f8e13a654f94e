use super::{
    relay_not_configured, respond, Action, ActionCallback, ActionExample, Content, Message,
};
use crate::config::Network;
use crate::format;
use crate::relay::{ContractCall, ContractCallExecutor, RelayService};
use crate::{Error, Result};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

const EXAMPLES: &[ActionExample] = &[ActionExample {
    input: "Interact with contract at 0x1234567890abcdef1234567890abcdef12345678 on Sepolia.",
    output: "✅ Contract interaction successful! Task ID: abc123",
}];

/// Structured content of a contract interaction message
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContractInteractionInput {
    /// JSON ABI array, or a string holding one
    #[serde(default)]
    pub abi: Option<Value>,
    #[serde(default)]
    pub function_name: Option<String>,
    #[serde(default)]
    pub args: Option<Vec<Value>>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub chain: Option<String>,
}

impl ContractInteractionInput {
    /// Check required fields and build the call
    pub fn into_call(self) -> Result<ContractCall> {
        let missing = || {
            Error::Validation(
                "Missing required inputs: abi, functionName, target, or chain.".to_string(),
            )
        };
        let present = |s: Option<String>| s.filter(|s| !s.trim().is_empty());

        let abi = match self.abi {
            None | Some(Value::Null) => return Err(missing()),
            Some(Value::String(s)) if s.trim().is_empty() => return Err(missing()),
            Some(Value::String(s)) => serde_json::from_str(&s)
                .map_err(|e| Error::Validation(format!("Invalid ABI: {}", e)))?,
            Some(abi) => abi,
        };
        let function_name = present(self.function_name).ok_or_else(missing)?;
        let target = present(self.target).ok_or_else(missing)?;
        let chain: Network = present(self.chain).ok_or_else(missing)?.parse()?;

        Ok(ContractCall {
            abi,
            function_name,
            args: self.args.unwrap_or_default(),
            target,
            chain,
        })
    }
}

/// Calls any contract function gaslessly through the relay
pub struct ContractInteractionAction {
    executor: Option<Arc<ContractCallExecutor<Arc<dyn RelayService>>>>,
}

impl ContractInteractionAction {
    pub fn new(executor: Option<Arc<ContractCallExecutor<Arc<dyn RelayService>>>>) -> Self {
        Self { executor }
    }

    async fn run(&self, message: &Message) -> Result<Content> {
        let executor = self.executor.as_ref().ok_or_else(relay_not_configured)?;
        let input: ContractInteractionInput = if message.content.is_null() {
            ContractInteractionInput::default()
        } else {
            serde_json::from_value(message.content.clone())
                .map_err(|e| Error::Validation(format!("Invalid contract call: {}", e)))?
        };
        let call = input.into_call()?;

        tracing::info!(contract = %call.target, chain = %call.chain, "Interacting with contract");
        let task = executor.execute(&call).await?;

        Ok(Content {
            text: format::contract_call_success(&task),
            data: Some(json!({
                "success": true,
                "taskId": task,
                "target": call.target,
                "chain": call.chain,
            })),
        })
    }
}

#[async_trait]
impl Action for ContractInteractionAction {
    fn name(&self) -> &'static str {
        "CONTRACT_INTERACTION"
    }

    fn similes(&self) -> &[&'static str] {
        &["CALL_SMART_CONTRACT", "INTERACT_CONTRACT", "GASLESS_CALL"]
    }

    fn description(&self) -> &'static str {
        "Interact with a smart contract function gaslessly using Gelato Relay."
    }

    fn examples(&self) -> &[ActionExample] {
        EXAMPLES
    }

    fn input_schema(&self) -> Option<Value> {
        Some(schemars::schema_for!(ContractInteractionInput).into())
    }

    fn validate(&self) -> Result<()> {
        self.executor.as_ref().map(|_| ()).ok_or_else(relay_not_configured)
    }

    async fn handle(&self, message: &Message, callback: Option<&ActionCallback>) -> String {
        let content = match self.run(message).await {
            Ok(content) => content,
            Err(e) => {
                tracing::error!(error = %e, "Error in contract interaction");
                Content {
                    text: format::contract_call_error(&e),
                    data: Some(json!({ "error": e.to_string() })),
                }
            }
        };
        respond(callback, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::coin_flip_abi;
    use crate::relay::tests::RecordingRelay;
    use std::sync::Mutex;

    const TARGET: &str = "0x1234567890abcdef1234567890abcdef12345678";

    fn action_with(relay: Arc<RecordingRelay>) -> ContractInteractionAction {
        let relay: Arc<dyn RelayService> = relay;
        ContractInteractionAction::new(Some(Arc::new(ContractCallExecutor::new(relay))))
    }

    #[tokio::test]
    async fn relays_call_and_reports_task() {
        let relay = Arc::new(RecordingRelay::default());
        let action = action_with(relay.clone());
        let message = Message::with_content(
            "deposit into the game",
            json!({
                "abi": coin_flip_abi(),
                "functionName": "withdraw",
                "args": ["1000"],
                "target": TARGET,
                "chain": "sepolia"
            }),
        );

        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let callback = move |content: &Content| *sink.lock().unwrap() = content.data.clone();

        let text = action.handle(&message, Some(&callback)).await;
        assert_eq!(text, "✅ Contract interaction successful! Task ID: task-1");
        assert_eq!(relay.requests.lock().unwrap()[0].chain_id, 11155111);
        assert_eq!(
            seen.lock().unwrap().clone().unwrap(),
            json!({"success": true, "taskId": "task-1", "target": TARGET, "chain": "sepolia"})
        );
    }

    #[tokio::test]
    async fn abi_may_be_a_json_string() {
        let relay = Arc::new(RecordingRelay::default());
        let action = action_with(relay.clone());
        let message = Message::with_content(
            "",
            json!({
                "abi": crate::chain::COIN_FLIP_ABI,
                "functionName": "deposit",
                "target": TARGET,
                "chain": "inkSepolia"
            }),
        );

        let text = action.handle(&message, None).await;
        assert!(text.starts_with("✅"), "{}", text);
        assert_eq!(relay.calls(), 1);
    }

    #[tokio::test]
    async fn missing_inputs_are_reported() {
        let relay = Arc::new(RecordingRelay::default());
        let action = action_with(relay.clone());

        let text = action
            .handle(
                &Message::with_content("", json!({"functionName": "deposit", "target": TARGET})),
                None,
            )
            .await;
        assert_eq!(
            text,
            "❌ Error in contract interaction: Missing required inputs: abi, functionName, target, or chain."
        );

        let text = action.handle(&Message::text("call it"), None).await;
        assert!(text.contains("Missing required inputs"));
        assert_eq!(relay.calls(), 0);
    }

    #[tokio::test]
    async fn invalid_target_is_rejected_before_relay() {
        let relay = Arc::new(RecordingRelay::default());
        let action = action_with(relay.clone());
        let message = Message::with_content(
            "",
            json!({
                "abi": coin_flip_abi(),
                "functionName": "deposit",
                "target": "0x1234",
                "chain": "sepolia"
            }),
        );

        let text = action.handle(&message, None).await;
        assert_eq!(
            text,
            "❌ Error in contract interaction: Invalid target address: Must be a valid Ethereum address"
        );
        assert_eq!(relay.calls(), 0);
    }

    #[test]
    fn schema_lists_fields() {
        let action = ContractInteractionAction::new(None);
        let schema = action.input_schema().unwrap();
        assert!(schema["properties"]["functionName"].is_object());
        assert!(action.validate().is_err());
    }
}

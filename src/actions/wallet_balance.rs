use super::{respond, Action, ActionCallback, ActionExample, Content, Message};
use crate::chain::CoinFlipReader;
use crate::config::Network;
use crate::format;
use crate::wallet::AgentWallet;
use async_trait::async_trait;
use std::sync::Arc;

const EXAMPLES: &[ActionExample] = &[ActionExample {
    input: "Check my balance",
    output: "💰 Wallet balance on **inkSepolia**: 2.543 ETH\n📍 Address: 0x...",
}];

/// Native balance of the agent wallet on the game network
pub struct WalletBalanceAction {
    reader: Arc<dyn CoinFlipReader>,
    wallet: AgentWallet,
    network: Network,
}

impl WalletBalanceAction {
    pub fn new(reader: Arc<dyn CoinFlipReader>, wallet: AgentWallet, network: Network) -> Self {
        Self {
            reader,
            wallet,
            network,
        }
    }
}

#[async_trait]
impl Action for WalletBalanceAction {
    fn name(&self) -> &'static str {
        "GET_WALLET_BALANCE"
    }

    fn similes(&self) -> &[&'static str] {
        &["GET_BALANCE", "CHECK_WALLET", "FETCH_FUNDS", "BALANCE_LOOKUP"]
    }

    fn description(&self) -> &'static str {
        "Fetch the wallet balance for the configured wallet address on the connected chain."
    }

    fn examples(&self) -> &[ActionExample] {
        EXAMPLES
    }

    async fn handle(&self, _message: &Message, callback: Option<&ActionCallback>) -> String {
        let address = self.wallet.address();
        tracing::info!(
            wallet = %address,
            network = %self.network,
            chain_id = self.network.chain_id(),
            "Fetching wallet balance"
        );

        let text = match self.reader.native_balance(address).await {
            Ok(balance) => format::wallet_balance(self.network, balance, address),
            Err(e) => {
                tracing::error!(error = %e, "Error fetching wallet balance");
                format::wallet_balance_error(&e)
            }
        };

        respond(callback, Content::text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::tests::FakeChain;
    use crate::{Error, Result};
    use alloy::primitives::{Address, U256};

    struct BrokenNode;

    #[async_trait]
    impl CoinFlipReader for BrokenNode {
        async fn eth_balance(&self, _player: Address) -> Result<U256> {
            Err(Error::Chain("connection refused".to_string()))
        }

        async fn current_round(&self) -> Result<u64> {
            Err(Error::Chain("connection refused".to_string()))
        }

        async fn native_balance(&self, _address: Address) -> Result<U256> {
            Err(Error::Chain("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn reports_native_balance() {
        let mut chain = FakeChain::new(1);
        chain.native = U256::from(2_543_000_000_000_000_000u128);
        let action = WalletBalanceAction::new(
            Arc::new(chain),
            AgentWallet::watch(Address::ZERO),
            Network::InkSepolia,
        );

        assert_eq!(
            action.handle(&Message::text("Check my balance"), None).await,
            "💰 Wallet balance on **inkSepolia**: 2.543 ETH\n📍 Address: 0x0000000000000000000000000000000000000000"
        );
    }

    #[tokio::test]
    async fn node_failure_is_error_text() {
        let action = WalletBalanceAction::new(
            Arc::new(BrokenNode),
            AgentWallet::watch(Address::ZERO),
            Network::InkSepolia,
        );
        assert_eq!(
            action.handle(&Message::text(""), None).await,
            "❌ Error fetching wallet balance: Chain read failed: connection refused"
        );
    }
}

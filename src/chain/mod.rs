//! On-chain reads
//!
//! Read-only queries against the coin-flip contract and native balances.
//! Writes never go through here; they are relayed (see `relay`).

mod abi;

pub use abi::{coin_flip_abi, ICoinFlip, COIN_FLIP_ABI};

use crate::config::redact_url;
use crate::game::RoundId;
use crate::{Error, Result};
use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use std::fmt::Display;
use std::sync::Arc;
use url::Url;

/// Reads the agent needs from the coin-flip contract and the chain
#[async_trait]
pub trait CoinFlipReader: Send + Sync {
    /// Deposited game balance of `player`, in wei
    async fn eth_balance(&self, player: Address) -> Result<U256>;

    /// Round currently accepting bets
    async fn current_round(&self) -> Result<RoundId>;

    /// Native coin balance of `address`, in wei
    async fn native_balance(&self, address: Address) -> Result<U256>;
}

#[async_trait]
impl<T: CoinFlipReader + ?Sized> CoinFlipReader for Arc<T> {
    async fn eth_balance(&self, player: Address) -> Result<U256> {
        (**self).eth_balance(player).await
    }

    async fn current_round(&self) -> Result<RoundId> {
        (**self).current_round().await
    }

    async fn native_balance(&self, address: Address) -> Result<U256> {
        (**self).native_balance(address).await
    }
}

/// JSON-RPC backed [`CoinFlipReader`]
pub struct RpcCoinFlip {
    rpc_url: Url,
    contract: Address,
}

impl RpcCoinFlip {
    pub fn new(rpc_url: &str, contract: Address) -> Result<Self> {
        let rpc_url = rpc_url
            .parse()
            .map_err(|e| Error::Config(format!("Invalid RPC URL: {}", e)))?;
        Ok(Self { rpc_url, contract })
    }

    /// Chain error with the endpoint reduced to its origin; transport errors
    /// echo the full URL, which may embed a provider key.
    fn chain_error(&self, context: &str, err: impl Display) -> Error {
        let full = self.rpc_url.as_str();
        let mut text = err
            .to_string()
            .replace(full, &redact_url(full))
            .replace(full.trim_end_matches('/'), &redact_url(full));
        let path = self.rpc_url.path();
        if path != "/" {
            text = text.replace(path, "/[REDACTED]");
        }
        if let Some(query) = self.rpc_url.query() {
            text = text.replace(query, "[REDACTED]");
        }
        Error::Chain(format!("{}: {}", context, text))
    }

    async fn call_uint(&self, function: &'static str, calldata: Vec<u8>) -> Result<U256> {
        let provider = ProviderBuilder::new().connect_http(self.rpc_url.clone());
        let tx = TransactionRequest::default()
            .to(self.contract)
            .input(Bytes::from(calldata).into());

        let result = provider
            .call(tx)
            .await
            .map_err(|e| self.chain_error(&format!("{} call failed", function), e))?;

        if result.len() < 32 {
            return Err(Error::Chain(format!(
                "{} returned {} bytes, expected a uint256",
                function,
                result.len()
            )));
        }
        Ok(U256::from_be_slice(&result[..32]))
    }
}

#[async_trait]
impl CoinFlipReader for RpcCoinFlip {
    async fn eth_balance(&self, player: Address) -> Result<U256> {
        let calldata = ICoinFlip::ethBalancesCall { player }.abi_encode();
        let balance = self.call_uint("ethBalances", calldata).await?;
        tracing::debug!(player = %player, balance = %balance, "Read game balance");
        Ok(balance)
    }

    async fn current_round(&self) -> Result<RoundId> {
        let calldata = ICoinFlip::currentRoundCall {}.abi_encode();
        let round = self.call_uint("currentRound", calldata).await?;
        u64::try_from(round)
            .map_err(|_| Error::Chain(format!("currentRound {} does not fit in u64", round)))
    }

    async fn native_balance(&self, address: Address) -> Result<U256> {
        let provider = ProviderBuilder::new().connect_http(self.rpc_url.clone());
        provider
            .get_balance(address)
            .await
            .map_err(|e| self.chain_error("Failed to get balance", e))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use alloy::primitives::address;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    /// Fixed chain state for action tests
    pub(crate) struct FakeChain {
        pub balances: Mutex<HashMap<Address, U256>>,
        pub native: U256,
        pub round: RoundId,
    }

    impl FakeChain {
        pub(crate) fn new(round: RoundId) -> Self {
            Self {
                balances: Mutex::new(HashMap::new()),
                native: U256::ZERO,
                round,
            }
        }

        pub(crate) fn with_balance(self, player: Address, wei: U256) -> Self {
            self.balances.lock().unwrap().insert(player, wei);
            self
        }
    }

    #[async_trait]
    impl CoinFlipReader for FakeChain {
        async fn eth_balance(&self, player: Address) -> Result<U256> {
            Ok(self
                .balances
                .lock()
                .unwrap()
                .get(&player)
                .copied()
                .unwrap_or_default())
        }

        async fn current_round(&self) -> Result<RoundId> {
            Ok(self.round)
        }

        async fn native_balance(&self, _address: Address) -> Result<U256> {
            Ok(self.native)
        }
    }

    fn word(value: u64) -> String {
        format!("0x{:064x}", value)
    }

    /// Minimal JSON-RPC node: answers by method name, echoing the request id
    async fn rpc_node(call_result: String, balance: &'static str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(move |req: &Request| {
                let body: Value = serde_json::from_slice(&req.body).unwrap();
                let result = match body["method"].as_str() {
                    Some("eth_call") => json!(call_result),
                    Some("eth_getBalance") => json!(balance),
                    Some("eth_chainId") => json!("0xba5ed"),
                    _ => json!("0x0"),
                };
                ResponseTemplate::new(200).set_body_json(json!({
                    "jsonrpc": "2.0",
                    "id": body["id"],
                    "result": result
                }))
            })
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn reads_current_round() {
        let server = rpc_node(word(42), "0x0").await;
        let reader = RpcCoinFlip::new(&server.uri(), Address::ZERO).unwrap();
        assert_eq!(reader.current_round().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn reads_game_balance() {
        let server = rpc_node(word(50_000_000_000_000_000), "0x0").await;
        let reader = RpcCoinFlip::new(
            &server.uri(),
            address!("0616d765019aa11ec5a50e2aea0e371b064c64f0"),
        )
        .unwrap();
        let balance = reader
            .eth_balance(address!("00000000000000000000000000000000000000aa"))
            .await
            .unwrap();
        assert_eq!(balance, U256::from(50_000_000_000_000_000u128));
    }

    #[tokio::test]
    async fn reads_native_balance() {
        let server = rpc_node("0x".to_string(), "0xde0b6b3a7640000").await;
        let reader = RpcCoinFlip::new(&server.uri(), Address::ZERO).unwrap();
        let balance = reader.native_balance(Address::ZERO).await.unwrap();
        assert_eq!(balance, U256::from(1_000_000_000_000_000_000u128));
    }

    #[tokio::test]
    async fn empty_call_result_is_chain_error() {
        let server = rpc_node("0x".to_string(), "0x0").await;
        let reader = RpcCoinFlip::new(&server.uri(), Address::ZERO).unwrap();
        let err = reader.current_round().await.unwrap_err();
        assert!(matches!(err, Error::Chain(_)));
    }

    #[test]
    fn invalid_rpc_url_is_config_error() {
        let err = RpcCoinFlip::new("not a url/sk-live-SECRET123", Address::ZERO).err().unwrap();
        assert!(matches!(err, Error::Config(_)));
        assert!(!err.to_string().contains("sk-live-SECRET123"));
    }

    #[tokio::test]
    async fn unreachable_node_error_hides_provider_key() {
        let reader = RpcCoinFlip::new(
            "http://127.0.0.1:1/v2/sk-live-SECRET123?key=sk-live-SECRET123",
            Address::ZERO,
        )
        .unwrap();

        for err in [
            reader.current_round().await.unwrap_err(),
            reader.native_balance(Address::ZERO).await.unwrap_err(),
        ] {
            let text = err.to_string();
            assert!(matches!(err, Error::Chain(_)), "{}", text);
            assert!(!text.contains("sk-live-SECRET123"), "{}", text);
        }
    }

    #[tokio::test]
    async fn node_error_body_keeps_context() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
            .mount(&server)
            .await;
        let reader =
            RpcCoinFlip::new(&format!("{}/v2/sk-live-SECRET123", server.uri()), Address::ZERO)
                .unwrap();

        let text = reader.current_round().await.unwrap_err().to_string();
        assert!(text.starts_with("Chain read failed: currentRound call failed: "), "{}", text);
        assert!(!text.contains("sk-live-SECRET123"), "{}", text);
    }
}

//! Coin-flip contract interface

use alloy::sol;
use serde_json::Value;

sol! {
    interface ICoinFlip {
        function currentRound() external view returns (uint256);
        function ethBalances(address player) external view returns (uint256);
        function minBetAmount() external view returns (uint256);
        function houseFeePercentage() external view returns (uint256);
        function deposit() external payable;
        function withdraw(uint256 amount) external;
        function placeBet(bool choice, uint256 amount) external;
        function resolveRound(bool outcome) external;
    }
}

/// Player-facing part of the coin-flip ABI, used for relayed calls
pub const COIN_FLIP_ABI: &str = r#"[
  {"type":"function","name":"currentRound","inputs":[],"outputs":[{"name":"","type":"uint256","internalType":"uint256"}],"stateMutability":"view"},
  {"type":"function","name":"ethBalances","inputs":[{"name":"","type":"address","internalType":"address"}],"outputs":[{"name":"","type":"uint256","internalType":"uint256"}],"stateMutability":"view"},
  {"type":"function","name":"minBetAmount","inputs":[],"outputs":[{"name":"","type":"uint256","internalType":"uint256"}],"stateMutability":"view"},
  {"type":"function","name":"houseFeePercentage","inputs":[],"outputs":[{"name":"","type":"uint256","internalType":"uint256"}],"stateMutability":"view"},
  {"type":"function","name":"deposit","inputs":[],"outputs":[],"stateMutability":"payable"},
  {"type":"function","name":"withdraw","inputs":[{"name":"amount","type":"uint256","internalType":"uint256"}],"outputs":[],"stateMutability":"nonpayable"},
  {"type":"function","name":"placeBet","inputs":[{"name":"choice","type":"bool","internalType":"bool"},{"name":"amount","type":"uint256","internalType":"uint256"}],"outputs":[],"stateMutability":"nonpayable"},
  {"type":"function","name":"resolveRound","inputs":[{"name":"outcome","type":"bool","internalType":"bool"}],"outputs":[],"stateMutability":"nonpayable"},
  {"type":"event","name":"BetPlaced","inputs":[{"name":"player","type":"address","indexed":true,"internalType":"address"},{"name":"amount","type":"uint256","indexed":false,"internalType":"uint256"},{"name":"choice","type":"bool","indexed":false,"internalType":"bool"},{"name":"round","type":"uint256","indexed":false,"internalType":"uint256"}],"anonymous":false},
  {"type":"event","name":"RoundResolved","inputs":[{"name":"round","type":"uint256","indexed":true,"internalType":"uint256"},{"name":"outcome","type":"bool","indexed":false,"internalType":"bool"},{"name":"winners","type":"address[]","indexed":false,"internalType":"address[]"}],"anonymous":false}
]"#;

/// [`COIN_FLIP_ABI`] as JSON
pub fn coin_flip_abi() -> Value {
    serde_json::from_str(COIN_FLIP_ABI).expect("static ABI is valid JSON")
}

//! Coin-Flip Game Agent
//!
//! Agent actions for an on-chain coin-flip game:
//! - Resolve rounds through the Game Coordinator backend with a fair coin
//! - Report round state and per-player results
//! - Turn free-text betting requests into contract calls
//! - Submit contract calls gaslessly through a sponsored relay
//!
//! # Security Model
//!
//! - API keys and the wallet key are read from the environment only
//! - Secrets are held in `SecretString` and never logged or serialized
//! - Every relayed call is validated before it is encoded or sent

pub mod actions;
pub mod chain;
pub mod config;
pub mod coordinator;
pub mod explorer;
pub mod format;
pub mod game;
pub mod intent;
pub mod relay;
pub mod units;
pub mod wallet;

mod error;

// Re-export commonly used types
pub use actions::{game_tracker_plugin, relay_plugin, Action, Message, Plugin, RelayDeps};
pub use config::{Config, Network, RpcConfig, Secrets};
pub use coordinator::{GameCoordinator, HttpCoordinator};
pub use error::{Error, Result};
pub use game::{CoinSide, ResolutionOutcome, ResolutionWorkflow, RoundId};
pub use relay::{ContractCall, ContractCallExecutor, GelatoRelay, RelayService, TaskId};

//! Error types for the coin-flip agent

use crate::game::RoundId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Round {0} not found")]
    RoundNotFound(RoundId),

    #[error("Round {0} has already been resolved")]
    AlreadyResolved(RoundId),

    #[error("Insufficient balance. Please deposit at least {required} ETH first.")]
    InsufficientBalance { required: String },

    #[error("Please specify an action: bet (heads/tails), show round, or check result")]
    UnknownIntent,

    #[error("{0}")]
    Validation(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Coordinator returned {status}: {body}")]
    Coordinator { status: u16, body: String },

    #[error("Relay error: {0}")]
    Relay(String),

    #[error("Explorer error: {0}")]
    Explorer(String),

    #[error("Chain read failed: {0}")]
    Chain(String),

    #[error("ABI error: {0}")]
    Abi(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error means the queried round does not exist server-side.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::RoundNotFound(_))
    }

    /// Precondition failures are caused by user input or game state and are
    /// never retried by the system.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::AlreadyResolved(_) | Error::InsufficientBalance { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_error_categories() {
        assert!(Error::RoundNotFound(4).is_not_found());
        assert!(!Error::RoundNotFound(4).is_precondition());
        assert!(Error::AlreadyResolved(4).is_precondition());
        assert!(Error::InsufficientBalance {
            required: "0.5".into()
        }
        .is_precondition());
        assert!(!Error::Relay("boom".into()).is_not_found());
        assert!(!Error::Relay("boom".into()).is_precondition());
    }

    #[test]
    fn insufficient_balance_message_names_amount() {
        let err = Error::InsufficientBalance {
            required: "0.05".into(),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient balance. Please deposit at least 0.05 ETH first."
        );
    }
}

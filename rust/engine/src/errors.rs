use thiserror::Error;

use crate::round::RoundState;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid bet amount: {amount}, must be positive")]
    InvalidAmount { amount: u64 },
    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientFunds { requested: u64, available: u64 },
    #[error("Betting time over (round is {state})")]
    RoundNotOpen { state: RoundState },
    #[error("Invalid transition: {operation} while round is {state}")]
    InvalidTransition {
        operation: &'static str,
        state: RoundState,
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Balance overflow: {balance} + {amount} exceeds the ledger range")]
    BalanceOverflow { balance: u64, amount: u64 },
}

impl GameError {
    /// True for failures caused by player input. These are reported to the
    /// player and leave engine state untouched; anything else is a caller bug.
    pub fn is_player_recoverable(&self) -> bool {
        matches!(
            self,
            GameError::InvalidAmount { .. }
                | GameError::InsufficientFunds { .. }
                | GameError::RoundNotOpen { .. }
        )
    }
}

//! Wallet error types.

use super::models::Side;
use thiserror::Error;

/// Wallet errors
#[derive(Debug, Error)]
pub enum WalletError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Insufficient balance
    #[error("Insufficient balance: available {available}, required {required}")]
    InsufficientBalance { available: i64, required: i64 },

    /// Invalid amount (must be positive)
    #[error("Invalid amount: {0}, bet amount must be greater than 0")]
    InvalidAmount(i64),

    /// Side is neither radiant nor dire
    #[error("Invalid team '{0}', choose radiant or dire")]
    InvalidSide(String),

    /// A bet is already placed on the other side
    #[error("You already bet on {existing}, you cannot change teams once your bet is placed")]
    SideLocked { existing: Side },

    /// A bet update must raise the amount
    #[error("You already bet {previous}, you can only increase your bet amount")]
    MustIncrease { previous: i64 },
}

impl WalletError {
    /// Get a client-safe error message that doesn't leak sensitive information
    pub fn client_message(&self) -> String {
        match self {
            WalletError::Database(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for wallet operations
pub type WalletResult<T> = Result<T, WalletError>;

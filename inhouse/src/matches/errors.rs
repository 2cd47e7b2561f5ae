//! Match reporting error types.

use crate::{rating::RatingError, wallet::WalletError};
use thiserror::Error;

/// Match reporting errors
#[derive(Debug, Error)]
pub enum MatchError {
    /// Match ID is not a number
    #[error("Match ID must be a number, got '{0}'")]
    InvalidMatchId(String),

    /// Provider has no result for the match
    #[error("Could not fetch match result for {0}")]
    MatchNotFound(i64),

    /// Match provider request failed
    #[error("Match provider error: {0}")]
    Provider(String),

    /// Rating update failed
    #[error(transparent)]
    Rating(#[from] RatingError),

    /// Bet resolution failed
    #[error(transparent)]
    Wallet(#[from] WalletError),
}

impl MatchError {
    /// Get a client-safe error message that doesn't leak sensitive information
    pub fn client_message(&self) -> String {
        match self {
            MatchError::Provider(_) => "Match provider unavailable".to_string(),
            MatchError::Rating(e) => e.client_message(),
            MatchError::Wallet(e) => e.client_message(),
            _ => self.to_string(),
        }
    }
}

/// Result type for match reporting
pub type MatchResult<T> = Result<T, MatchError>;

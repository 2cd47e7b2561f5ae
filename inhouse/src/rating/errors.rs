//! Rating error types.

use crate::lobby::UserId;
use thiserror::Error;

/// Rating errors
#[derive(Debug, Error)]
pub enum RatingError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Input is not a numeric Steam ID or friend code
    #[error("Invalid Steam ID: {0}")]
    InvalidSteamId(String),

    /// Rating provider request failed
    #[error("Rating provider error: {0}")]
    Provider(String),

    /// Rating is out of range
    #[error("Invalid rating: {0}")]
    InvalidRating(i64),

    /// No profile is stored for the user
    #[error("No profile for user {0}")]
    ProfileNotFound(UserId),
}

impl RatingError {
    /// Get a client-safe error message that doesn't leak sensitive information
    pub fn client_message(&self) -> String {
        match self {
            RatingError::Database(_) => "Internal server error".to_string(),
            RatingError::Provider(_) => "Rating provider unavailable".to_string(),
            RatingError::InvalidSteamId(_) => {
                "Please provide a valid numeric Steam friend code or Steam ID".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Result type for rating operations
pub type RatingResult<T> = Result<T, RatingError>;

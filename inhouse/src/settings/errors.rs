//! Settings error types.

use thiserror::Error;

/// Settings errors
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Value rejected for the setting
    #[error("Invalid {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    /// Stored key is not recognized
    #[error("Unknown setting: {0}")]
    UnknownKey(String),
}

impl SettingsError {
    /// Get a client-safe error message that doesn't leak sensitive information
    pub fn client_message(&self) -> String {
        match self {
            SettingsError::Database(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for settings operations
pub type SettingsResult<T> = Result<T, SettingsError>;

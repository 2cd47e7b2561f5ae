//! Permission error types.

use thiserror::Error;

/// Permission errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Bridge did not present a token
    #[error("Missing bridge token")]
    MissingToken,

    /// Bridge token did not match
    #[error("Invalid bridge token")]
    InvalidToken,

    /// Actor lacks admin rights for the action
    #[error("Permission denied: {action} requires an administrator or the '{role}' role")]
    Forbidden { action: String, role: String },
}

impl AuthError {
    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Token failures collapse into one message so callers cannot tell a
    /// missing token from a wrong one.
    pub fn client_message(&self) -> String {
        match self {
            AuthError::MissingToken | AuthError::InvalidToken => {
                "Authentication failed".to_string()
            }
            AuthError::Forbidden { .. } => self.to_string(),
        }
    }
}

/// Result type for permission checks
pub type AuthResult<T> = Result<T, AuthError>;

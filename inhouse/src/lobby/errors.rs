//! Lobby error types.

use super::entities::UserId;
use thiserror::Error;

/// Lobby errors
///
/// Every variant is a local, recoverable condition reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LobbyError {
    /// Enumeration invoked on a roster that is not exactly full
    #[error("Lobby needs exactly {expected} players, found {actual}")]
    InvalidRosterSize { expected: usize, actual: usize },

    /// Participant already joined
    #[error("Player {0} is already in the lobby")]
    AlreadyPresent(UserId),

    /// Participant not in the roster
    #[error("Player {0} is not in the lobby")]
    NotPresent(UserId),

    /// Roster already holds the maximum number of participants
    #[error("Lobby is already full ({capacity}/{capacity})")]
    RosterFull { capacity: usize },

    /// Reroll requested without a generated rotation for the current roster
    #[error("No teams have been generated for the current roster")]
    NoActiveRotation,

    /// Lobby actor has shut down
    #[error("Lobby is closed")]
    LobbyClosed,
}

/// Result type for lobby operations
pub type LobbyResult<T> = Result<T, LobbyError>;

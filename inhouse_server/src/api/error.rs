//! Mapping of domain errors onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use inhouse::{
    auth::AuthError, command::CommandError, lobby::LobbyError, matches::MatchError,
    rating::RatingError, settings::SettingsError, wallet::WalletError,
};
use serde::Serialize;
use thiserror::Error;

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors returned by API handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Lobby(#[from] LobbyError),

    #[error(transparent)]
    Rating(#[from] RatingError),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Command(#[from] CommandError),

    /// Malformed request outside the domain types (headers, bodies)
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth(AuthError::MissingToken | AuthError::InvalidToken) => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Auth(AuthError::Forbidden { .. }) => StatusCode::FORBIDDEN,

            ApiError::Lobby(e) => lobby_status(e),
            ApiError::Rating(e) => rating_status(e),
            ApiError::Wallet(e) => wallet_status(e),

            ApiError::Match(MatchError::InvalidMatchId(_)) => StatusCode::BAD_REQUEST,
            ApiError::Match(MatchError::MatchNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Match(MatchError::Provider(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Match(MatchError::Rating(e)) => rating_status(e),
            ApiError::Match(MatchError::Wallet(e)) => wallet_status(e),

            ApiError::Settings(SettingsError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Settings(_) => StatusCode::BAD_REQUEST,

            ApiError::Command(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to return to the bridge
    pub fn client_message(&self) -> String {
        match self {
            ApiError::Auth(e) => e.client_message(),
            ApiError::Rating(e) => e.client_message(),
            ApiError::Wallet(e) => e.client_message(),
            ApiError::Match(e) => e.client_message(),
            ApiError::Settings(e) => e.client_message(),
            ApiError::Lobby(_) | ApiError::Command(_) | ApiError::BadRequest(_) => self.to_string(),
        }
    }
}

fn lobby_status(error: &LobbyError) -> StatusCode {
    match error {
        LobbyError::NotPresent(_) => StatusCode::NOT_FOUND,
        LobbyError::AlreadyPresent(_)
        | LobbyError::RosterFull { .. }
        | LobbyError::InvalidRosterSize { .. }
        | LobbyError::NoActiveRotation => StatusCode::CONFLICT,
        LobbyError::LobbyClosed => StatusCode::SERVICE_UNAVAILABLE,
    }
}

fn rating_status(error: &RatingError) -> StatusCode {
    match error {
        RatingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        RatingError::InvalidSteamId(_) | RatingError::InvalidRating(_) => StatusCode::BAD_REQUEST,
        RatingError::Provider(_) => StatusCode::BAD_GATEWAY,
        RatingError::ProfileNotFound(_) => StatusCode::NOT_FOUND,
    }
}

fn wallet_status(error: &WalletError) -> StatusCode {
    match error {
        WalletError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        WalletError::InvalidAmount(_) | WalletError::InvalidSide(_) => StatusCode::BAD_REQUEST,
        WalletError::InsufficientBalance { .. }
        | WalletError::SideLocked { .. }
        | WalletError::MustIncrease { .. } => StatusCode::CONFLICT,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.client_message(),
            }),
        )
            .into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use inhouse::wallet::Side;

    #[test]
    fn test_lobby_statuses() {
        assert_eq!(
            ApiError::from(LobbyError::RosterFull { capacity: 10 }).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(LobbyError::NotPresent(1)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(LobbyError::NoActiveRotation).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_auth_statuses() {
        assert_eq!(
            ApiError::from(AuthError::MissingToken).status(),
            StatusCode::UNAUTHORIZED
        );
        let forbidden = ApiError::from(AuthError::Forbidden {
            action: "reroll".to_string(),
            role: "Inhouse Admin".to_string(),
        });
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
        assert!(forbidden.client_message().contains("reroll"));
    }

    #[test]
    fn test_wallet_and_match_statuses() {
        assert_eq!(
            ApiError::from(WalletError::SideLocked {
                existing: Side::Dire
            })
            .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(WalletError::InvalidAmount(0)).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(MatchError::MatchNotFound(5)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(MatchError::Wallet(WalletError::InvalidAmount(0))).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_database_errors_are_sanitized() {
        let error = ApiError::from(SettingsError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.client_message(), "Internal server error");
    }
}

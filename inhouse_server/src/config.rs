//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use inhouse::{
    db::DatabaseConfig,
    lobby::{LobbyConfig, UserId},
    rating::InhouseRatingConfig,
    wallet::DEFAULT_WALLET_BALANCE,
};
use std::{net::SocketAddr, time::Duration};

/// Minimum bridge token length
pub const MIN_BRIDGE_TOKEN_LEN: usize = 32;

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Run on the in-process store instead of PostgreSQL
    pub in_memory: bool,
    /// Security configuration
    pub security: SecurityConfig,
    /// Lobby rotation settings
    pub lobby: LobbyConfig,
    /// Inhouse rating settings
    pub inhouse_rating: InhouseRatingConfig,
    /// Starting balance of a wallet
    pub wallet_default_balance: i64,
    /// STRATZ API token; ratings and match results are unavailable without it
    pub stratz_token: Option<String>,
    /// Hours between rating refreshes
    pub rating_refresh_hours: u64,
    /// Prometheus exporter bind address
    pub metrics_bind: Option<SocketAddr>,
}

/// Security-related configuration
#[derive(Clone)]
pub struct SecurityConfig {
    /// Shared secret the chat bridge presents as a bearer token (required)
    pub bridge_token: String,
    /// Users that may run admin commands in every guild
    pub global_admin_ids: Vec<UserId>,
    /// Guild roles granting admin rights
    pub admin_roles: Vec<String>,
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("bridge_token", &"***")
            .field("global_admin_ids", &self.global_admin_ids)
            .field("admin_roles", &self.admin_roles)
            .finish()
    }
}

impl ServerConfig {
    /// Configuration with defaults for everything except the bridge token
    pub fn new(bridge_token: impl Into<String>) -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 6969)),
            database: DatabaseConfig::default(),
            in_memory: false,
            security: SecurityConfig {
                bridge_token: bridge_token.into(),
                global_admin_ids: Vec::new(),
                admin_roles: vec![inhouse::auth::DEFAULT_ADMIN_ROLE.to_string()],
            },
            lobby: LobbyConfig::default(),
            inhouse_rating: InhouseRatingConfig::default(),
            wallet_default_balance: DEFAULT_WALLET_BALANCE,
            stratz_token: None,
            rating_refresh_hours: 24,
            metrics_bind: None,
        }
    }

    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `database_url_override` - Optional database URL override (from CLI args)
    /// * `in_memory` - Use the in-process store (from CLI args)
    ///
    /// # Returns
    ///
    /// * `Result<ServerConfig, ConfigError>` - Loaded configuration or error
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or invalid
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        database_url_override: Option<String>,
        in_memory: bool,
    ) -> Result<Self, ConfigError> {
        let bind = match bind_override {
            Some(bind) => bind,
            None => parse_env_or("SERVER_BIND", SocketAddr::from(([127, 0, 0, 1], 6969))),
        };

        let defaults = DatabaseConfig::default();
        let database_url = database_url_override
            .or_else(|| std::env::var("DATABASE_URL").ok())
            .unwrap_or(defaults.database_url);

        let database = DatabaseConfig {
            database_url,
            max_connections: parse_env_or("DB_MAX_CONNECTIONS", defaults.max_connections),
            min_connections: parse_env_or("DB_MIN_CONNECTIONS", defaults.min_connections),
            connection_timeout_secs: parse_env_or(
                "DB_CONNECTION_TIMEOUT_SECS",
                defaults.connection_timeout_secs,
            ),
            idle_timeout_secs: parse_env_or("DB_IDLE_TIMEOUT_SECS", defaults.idle_timeout_secs),
            max_lifetime_secs: parse_env_or("DB_MAX_LIFETIME_SECS", defaults.max_lifetime_secs),
        };

        // Security configuration (REQUIRED)
        let bridge_token =
            std::env::var("BRIDGE_TOKEN").map_err(|_| ConfigError::MissingRequired {
                var: "BRIDGE_TOKEN".to_string(),
                hint: "Generate with: openssl rand -hex 32".to_string(),
            })?;

        let global_admin_ids = match std::env::var("GLOBAL_ADMIN_IDS") {
            Ok(value) => parse_id_list(&value).map_err(|reason| ConfigError::Invalid {
                var: "GLOBAL_ADMIN_IDS".to_string(),
                reason,
            })?,
            Err(_) => Vec::new(),
        };

        let admin_roles = std::env::var("ADMIN_ROLES")
            .ok()
            .map(|value| parse_name_list(&value))
            .filter(|roles| !roles.is_empty())
            .unwrap_or_else(|| vec![inhouse::auth::DEFAULT_ADMIN_ROLE.to_string()]);

        let lobby_defaults = LobbyConfig::default();
        let lobby = LobbyConfig {
            max_rolls: parse_env_or("LOBBY_MAX_ROLLS", lobby_defaults.max_rolls),
            draft_max_rolls: parse_env_or("DRAFT_MAX_ROLLS", lobby_defaults.draft_max_rolls),
            inbox_capacity: parse_env_or("LOBBY_INBOX_CAPACITY", lobby_defaults.inbox_capacity),
        };

        let rating_defaults = InhouseRatingConfig::default();
        let inhouse_rating = InhouseRatingConfig {
            default_rating: parse_env_or("DEFAULT_INHOUSE_MMR", rating_defaults.default_rating),
            gain: parse_env_or("INHOUSE_MMR_GAIN", rating_defaults.gain),
            loss: parse_env_or("INHOUSE_MMR_LOSS", rating_defaults.loss),
            leaderboard_size: parse_env_or("LEADERBOARD_SIZE", rating_defaults.leaderboard_size),
        };

        let metrics_bind = match std::env::var("METRICS_BIND") {
            Ok(value) => Some(value.parse().map_err(|_| ConfigError::Invalid {
                var: "METRICS_BIND".to_string(),
                reason: format!("'{}' is not a socket address", value),
            })?),
            Err(_) => None,
        };

        Ok(ServerConfig {
            bind,
            database,
            in_memory,
            security: SecurityConfig {
                bridge_token,
                global_admin_ids,
                admin_roles,
            },
            lobby,
            inhouse_rating,
            wallet_default_balance: parse_env_or(
                "DEFAULT_WALLET_BALANCE",
                DEFAULT_WALLET_BALANCE,
            ),
            stratz_token: std::env::var("STRATZ_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),
            rating_refresh_hours: parse_env_or("RATING_REFRESH_HOURS", 24),
            metrics_bind,
        })
    }

    /// Validate configuration after loading
    ///
    /// # Returns
    ///
    /// * `Result<(), ConfigError>` - Success or validation error
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.bridge_token.len() < MIN_BRIDGE_TOKEN_LEN {
            return Err(ConfigError::Invalid {
                var: "BRIDGE_TOKEN".to_string(),
                reason: format!(
                    "Must be at least {} characters (128-bit security)",
                    MIN_BRIDGE_TOKEN_LEN
                ),
            });
        }

        if !self.in_memory {
            self.database
                .validate()
                .map_err(|reason| ConfigError::Invalid {
                    var: "DATABASE_URL".to_string(),
                    reason,
                })?;
        }

        self.lobby.validate().map_err(|reason| ConfigError::Invalid {
            var: "LOBBY_MAX_ROLLS".to_string(),
            reason,
        })?;

        self.inhouse_rating
            .validate()
            .map_err(|reason| ConfigError::Invalid {
                var: "INHOUSE_MMR_GAIN".to_string(),
                reason,
            })?;

        if self.wallet_default_balance < 0 {
            return Err(ConfigError::Invalid {
                var: "DEFAULT_WALLET_BALANCE".to_string(),
                reason: "Must not be negative".to_string(),
            });
        }

        if self.rating_refresh_hours == 0 {
            return Err(ConfigError::Invalid {
                var: "RATING_REFRESH_HOURS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Interval of the background rating refresh
    pub fn rating_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.rating_refresh_hours * 3600)
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parse a comma-separated list of user IDs
fn parse_id_list(value: &str) -> Result<Vec<UserId>, String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse()
                .map_err(|_| format!("'{}' is not a user ID", id))
        })
        .collect()
}

/// Parse a comma-separated list of names
fn parse_name_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ServerConfig {
        ServerConfig::new("a".repeat(32))
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingRequired {
            var: "BRIDGE_TOKEN".to_string(),
            hint: "Use openssl".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("BRIDGE_TOKEN"));
        assert!(msg.contains("Use openssl"));
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = valid_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind.to_string(), "127.0.0.1:6969");
        assert_eq!(config.lobby.max_rolls, 5);
        assert_eq!(config.lobby.draft_max_rolls, 3);
        assert_eq!(config.wallet_default_balance, 1000);
        assert_eq!(config.rating_refresh_interval(), Duration::from_secs(86_400));
    }

    #[test]
    fn test_config_validation_short_token() {
        let config = ServerConfig::new("short");

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "BRIDGE_TOKEN"));
    }

    #[test]
    fn test_config_validation_zero_rolls() {
        let mut config = valid_config();
        config.lobby.max_rolls = 0;

        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::Invalid { .. }
        ));
    }

    #[test]
    fn test_config_validation_negative_balance() {
        let mut config = valid_config();
        config.wallet_default_balance = -1;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_memory_mode_skips_database_validation() {
        let mut config = valid_config();
        config.database.database_url = String::new();
        assert!(config.validate().is_err());

        config.in_memory = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_id_list() {
        assert_eq!(parse_id_list("1, 2,,3").unwrap(), vec![1, 2, 3]);
        assert!(parse_id_list("1,abc").is_err());
        assert!(parse_id_list("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_name_list() {
        assert_eq!(
            parse_name_list("Inhouse Admin, Mods ,"),
            vec!["Inhouse Admin".to_string(), "Mods".to_string()]
        );
    }

    #[test]
    fn test_security_config_debug_hides_token() {
        let config = valid_config();
        let debug = format!("{:?}", config.security);
        assert!(!debug.contains(&"a".repeat(32)));
    }
}

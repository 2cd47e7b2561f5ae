//! Inhouse rating configuration.

use serde::{Deserialize, Serialize};

/// Inhouse rating configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InhouseRatingConfig {
    /// Rating of a player with no reported matches
    pub default_rating: i64,

    /// Points gained per win
    pub gain: i64,

    /// Points lost per loss
    pub loss: i64,

    /// Entries shown on the leaderboard
    pub leaderboard_size: usize,
}

impl Default for InhouseRatingConfig {
    fn default() -> Self {
        Self {
            default_rating: 1000,
            gain: 50,
            loss: 50,
            leaderboard_size: 10,
        }
    }
}

impl InhouseRatingConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.gain <= 0 {
            return Err("Inhouse rating gain must be positive".to_string());
        }

        if self.loss <= 0 {
            return Err("Inhouse rating loss must be positive".to_string());
        }

        if self.leaderboard_size == 0 {
            return Err("Leaderboard size must be at least 1".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(InhouseRatingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_steps() {
        let config = InhouseRatingConfig {
            gain: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = InhouseRatingConfig {
            loss: -5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}

//! Lobby configuration models.

use super::rotation::{DEFAULT_DRAFT_MAX_ROLLS, DEFAULT_MAX_ROLLS};
use serde::{Deserialize, Serialize};

/// How a full lobby is turned into a match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InhouseMode {
    /// Rating-balanced 5v5 teams
    #[default]
    Regular,
    /// Two close-rated captains draft from the remaining eight
    Immortal,
}

impl InhouseMode {
    /// Parse a mode name, falling back to `Regular` for anything unrecognised
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for InhouseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InhouseMode::Regular => write!(f, "regular"),
            InhouseMode::Immortal => write!(f, "immortal"),
        }
    }
}

impl std::str::FromStr for InhouseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "regular" => Ok(InhouseMode::Regular),
            "immortal" => Ok(InhouseMode::Immortal),
            other => Err(format!("Unknown inhouse mode: {}", other)),
        }
    }
}

/// Lobby configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyConfig {
    /// Reroll bound in regular mode (default: 5)
    pub max_rolls: u32,

    /// Reroll bound in captain-draft mode (default: 3)
    pub draft_max_rolls: u32,

    /// Capacity of each lobby actor's inbox
    pub inbox_capacity: usize,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            max_rolls: DEFAULT_MAX_ROLLS,
            draft_max_rolls: DEFAULT_DRAFT_MAX_ROLLS,
            inbox_capacity: 100,
        }
    }
}

impl LobbyConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_rolls == 0 || self.max_rolls > 252 {
            return Err("Max rolls must be between 1 and 252".to_string());
        }

        if self.draft_max_rolls > 44 {
            return Err("Draft max rolls must be between 0 and 44".to_string());
        }

        if self.inbox_capacity == 0 {
            return Err("Inbox capacity must be greater than 0".to_string());
        }

        Ok(())
    }
}

//! Rating data models.

use crate::lobby::{GuildId, Rating, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 32-bit Steam account ID
pub type SteamId = i64;

/// Stored player profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub user_id: UserId,
    /// Linked Steam account; absent when only an admin-set rating exists
    pub steam_id: Option<SteamId>,
    pub display_name: String,
    /// Estimated rating; absent when the provider could not determine it
    pub mmr: Option<Rating>,
    pub season_rank: Option<u32>,
    pub updated_at: DateTime<Utc>,
}

impl PlayerProfile {
    /// Rating used for balancing, 0 when unknown
    pub fn rating(&self) -> Rating {
        self.mmr.unwrap_or(0)
    }
}

/// Inhouse rating for one user in one guild
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InhouseRating {
    pub guild_id: GuildId,
    pub user_id: UserId,
    pub rating: i64,
}

/// Inhouse rating change applied by a match result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingChange {
    pub user_id: UserId,
    pub old_rating: i64,
    pub new_rating: i64,
}

impl RatingChange {
    pub fn delta(&self) -> i64 {
        self.new_rating - self.old_rating
    }
}

/// Result of re-fetching every linked profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshSummary {
    pub checked: usize,
    pub updated: usize,
    pub failed: usize,
}

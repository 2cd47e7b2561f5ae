//! Rating provider abstraction.

use super::{errors::RatingResult, models::SteamId};
use async_trait::async_trait;
use std::{collections::HashMap, sync::Mutex};

/// External source of season ranks
#[async_trait]
pub trait RatingSource: Send + Sync {
    /// Fetch the season rank for a Steam account
    ///
    /// # Returns
    ///
    /// * `RatingResult<Option<u32>>` - `None` when the provider has no rank
    async fn fetch_season_rank(&self, steam_id: SteamId) -> RatingResult<Option<u32>>;
}

/// Rating source answering from a fixed table
///
/// Used when no provider token is configured and in tests.
#[derive(Debug, Default)]
pub struct FixedRatingSource {
    ranks: Mutex<HashMap<SteamId, u32>>,
}

impl FixedRatingSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rank(self, steam_id: SteamId, season_rank: u32) -> Self {
        self.set_rank(steam_id, season_rank);
        self
    }

    pub fn set_rank(&self, steam_id: SteamId, season_rank: u32) {
        if let Ok(mut ranks) = self.ranks.lock() {
            ranks.insert(steam_id, season_rank);
        }
    }
}

#[async_trait]
impl RatingSource for FixedRatingSource {
    async fn fetch_season_rank(&self, steam_id: SteamId) -> RatingResult<Option<u32>> {
        Ok(self
            .ranks
            .lock()
            .ok()
            .and_then(|ranks| ranks.get(&steam_id).copied()))
    }
}

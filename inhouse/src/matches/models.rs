//! Match reporting data models.

use crate::{
    lobby::UserId,
    rating::{RatingChange, SteamId},
    wallet::{Payout, Side},
};
use serde::{Deserialize, Serialize};

/// Match ID as issued by the game
pub type MatchId = i64;

/// Result of a finished match as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishedMatch {
    pub match_id: MatchId,
    pub radiant_win: bool,
    /// Steam account IDs on Radiant
    pub radiant: Vec<SteamId>,
    /// Steam account IDs on Dire
    pub dire: Vec<SteamId>,
}

impl FinishedMatch {
    pub fn winning_side(&self) -> Side {
        Side::winner(self.radiant_win)
    }

    /// Steam IDs of the winning and losing sides
    pub fn winners_and_losers(&self) -> (&[SteamId], &[SteamId]) {
        if self.radiant_win {
            (&self.radiant, &self.dire)
        } else {
            (&self.dire, &self.radiant)
        }
    }
}

/// Everything a submitted match changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    pub match_id: MatchId,
    pub winning_side: Side,
    pub winners: Vec<UserId>,
    pub losers: Vec<UserId>,
    /// Steam IDs with no linked user, skipped for rating changes
    pub unmapped: Vec<SteamId>,
    pub rating_changes: Vec<RatingChange>,
    pub payouts: Vec<Payout>,
    pub bets_cleared: u64,
}

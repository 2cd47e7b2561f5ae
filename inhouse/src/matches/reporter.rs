//! Applies a finished match to inhouse ratings and open bets.

use super::{
    errors::{MatchError, MatchResult},
    models::{MatchId, MatchReport},
    source::MatchResultSource,
};
use crate::{
    lobby::{GuildId, UserId},
    rating::{InhouseRatingService, RatingService, SteamId},
    wallet::WalletManager,
};
use std::sync::Arc;

/// Match reporter
#[derive(Clone)]
pub struct MatchReporter {
    source: Arc<dyn MatchResultSource>,
    ratings: RatingService,
    inhouse: InhouseRatingService,
    wallet: WalletManager,
}

impl MatchReporter {
    pub fn new(
        source: Arc<dyn MatchResultSource>,
        ratings: RatingService,
        inhouse: InhouseRatingService,
        wallet: WalletManager,
    ) -> Self {
        Self {
            source,
            ratings,
            inhouse,
            wallet,
        }
    }

    /// Submit a finished match for a guild
    ///
    /// Players are mapped from Steam accounts to linked users; unlinked
    /// accounts are logged and skipped. Inhouse ratings are adjusted, winning
    /// bets paid and every open bet of the guild cleared.
    ///
    /// # Arguments
    ///
    /// * `guild_id` - Guild the match was played for
    /// * `match_id` - Match ID as typed by the admin
    ///
    /// # Returns
    ///
    /// * `MatchResult<MatchReport>` - Applied changes
    ///
    /// # Errors
    ///
    /// * `MatchError::InvalidMatchId` - Match ID is not numeric
    /// * `MatchError::MatchNotFound` - Provider has no result
    pub async fn submit(&self, guild_id: GuildId, match_id: &str) -> MatchResult<MatchReport> {
        let trimmed = match_id.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(MatchError::InvalidMatchId(match_id.to_string()));
        }
        let id: MatchId = trimmed
            .parse()
            .map_err(|_| MatchError::InvalidMatchId(match_id.to_string()))?;

        let finished = self
            .source
            .fetch_match(id)
            .await?
            .ok_or(MatchError::MatchNotFound(id))?;

        let (winning_ids, losing_ids) = finished.winners_and_losers();
        let mut unmapped = Vec::new();
        let winners = self.map_players(winning_ids, &mut unmapped).await?;
        let losers = self.map_players(losing_ids, &mut unmapped).await?;

        log::info!(
            "Match {}: mapped {}/{} Steam IDs to users",
            id,
            winners.len() + losers.len(),
            winning_ids.len() + losing_ids.len()
        );

        let winning_side = finished.winning_side();
        let rating_changes = self.inhouse.adjust(guild_id, &winners, &losers).await?;
        let settlement = self.wallet.settle(guild_id, winning_side).await?;

        log::info!("Guild {}: match {} submitted, {} won", guild_id, id, winning_side);

        Ok(MatchReport {
            match_id: id,
            winning_side,
            winners,
            losers,
            unmapped,
            rating_changes,
            payouts: settlement.payouts,
            bets_cleared: settlement.cleared,
        })
    }

    async fn map_players(
        &self,
        steam_ids: &[SteamId],
        unmapped: &mut Vec<SteamId>,
    ) -> MatchResult<Vec<UserId>> {
        let mut users = Vec::with_capacity(steam_ids.len());

        for &steam_id in steam_ids {
            match self.ratings.find_user_by_steam_id(steam_id).await? {
                Some(user_id) => users.push(user_id),
                None => {
                    log::warn!("No user linked to Steam ID {}", steam_id);
                    unmapped.push(steam_id);
                }
            }
        }

        Ok(users)
    }
}

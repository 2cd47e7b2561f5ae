//! Inhouse rating earned from reported matches.

use super::{
    config::InhouseRatingConfig,
    errors::RatingResult,
    models::{InhouseRating, RatingChange},
};
use crate::{
    db::InhouseRatingRepository,
    lobby::{GuildId, UserId},
};
use std::sync::Arc;

/// Inhouse rating service, scoped per guild
#[derive(Clone)]
pub struct InhouseRatingService {
    repository: Arc<dyn InhouseRatingRepository>,
    config: InhouseRatingConfig,
}

impl InhouseRatingService {
    pub fn new(repository: Arc<dyn InhouseRatingRepository>, config: InhouseRatingConfig) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> &InhouseRatingConfig {
        &self.config
    }

    /// Get a user's inhouse rating, the configured default when unrated
    pub async fn rating_of(&self, guild_id: GuildId, user_id: UserId) -> RatingResult<i64> {
        Ok(self
            .repository
            .inhouse_rating(guild_id, user_id)
            .await?
            .unwrap_or(self.config.default_rating))
    }

    /// Apply a match result
    ///
    /// # Arguments
    ///
    /// * `guild_id` - Guild the match was played in
    /// * `winners` - Users on the winning side
    /// * `losers` - Users on the losing side
    ///
    /// # Returns
    ///
    /// * `RatingResult<Vec<RatingChange>>` - Changes, winners first
    pub async fn adjust(
        &self,
        guild_id: GuildId,
        winners: &[UserId],
        losers: &[UserId],
    ) -> RatingResult<Vec<RatingChange>> {
        let mut changes = Vec::with_capacity(winners.len() + losers.len());

        let sides = [(winners, self.config.gain), (losers, -self.config.loss)];
        for (users, delta) in sides {
            for &user_id in users {
                let old_rating = self.rating_of(guild_id, user_id).await?;
                let new_rating = old_rating + delta;
                self.repository
                    .set_inhouse_rating(guild_id, user_id, new_rating)
                    .await?;
                changes.push(RatingChange {
                    user_id,
                    old_rating,
                    new_rating,
                });
            }
        }

        log::info!(
            "Guild {}: inhouse ratings adjusted for {} winner(s), {} loser(s)",
            guild_id,
            winners.len(),
            losers.len()
        );
        Ok(changes)
    }

    /// Top rated players of a guild, highest first
    pub async fn leaderboard(&self, guild_id: GuildId) -> RatingResult<Vec<InhouseRating>> {
        self.repository
            .top_inhouse_ratings(guild_id, self.config.leaderboard_size)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn service() -> InhouseRatingService {
        InhouseRatingService::new(Arc::new(MemoryStore::new()), InhouseRatingConfig::default())
    }

    #[tokio::test]
    async fn test_default_rating() {
        assert_eq!(service().rating_of(1, 2).await.expect("rating"), 1000);
    }

    #[tokio::test]
    async fn test_adjust_gain_and_loss() {
        let service = service();
        let changes = service.adjust(1, &[10, 11], &[20]).await.expect("adjust");

        assert_eq!(changes.len(), 3);
        assert_eq!(changes[0].delta(), 50);
        assert_eq!(changes[2].delta(), -50);
        assert_eq!(service.rating_of(1, 10).await.expect("rating"), 1050);
        assert_eq!(service.rating_of(1, 20).await.expect("rating"), 950);

        // Ratings are per guild
        assert_eq!(service.rating_of(2, 10).await.expect("rating"), 1000);
    }

    #[tokio::test]
    async fn test_leaderboard_order_and_size() {
        let service = service();
        for user in 1..=12 {
            for _ in 0..user {
                service.adjust(1, &[user], &[]).await.expect("adjust");
            }
        }

        let board = service.leaderboard(1).await.expect("leaderboard");
        assert_eq!(board.len(), 10);
        assert_eq!(board[0].user_id, 12);
        assert_eq!(board[0].rating, 1600);
        assert!(board.windows(2).all(|w| w[0].rating >= w[1].rating));
    }
}

//! Player rating service backed by a profile repository and a rating source.

use super::{
    errors::{RatingError, RatingResult},
    models::{PlayerProfile, RefreshSummary, SteamId},
    rank::{convert_to_steam32, season_rank_to_mmr},
    source::RatingSource,
};
use crate::{
    db::ProfileRepository,
    lobby::{Participant, Rating, UserId},
};
use chrono::Utc;
use std::sync::Arc;

/// Player rating service
///
/// Network lookups happen here, before a participant snapshot is handed to a
/// lobby, so lobby actors never wait on the provider.
#[derive(Clone)]
pub struct RatingService {
    profiles: Arc<dyn ProfileRepository>,
    source: Arc<dyn RatingSource>,
}

impl RatingService {
    /// Create a new rating service
    ///
    /// # Arguments
    ///
    /// * `profiles` - Profile storage
    /// * `source` - Season rank provider
    pub fn new(profiles: Arc<dyn ProfileRepository>, source: Arc<dyn RatingSource>) -> Self {
        Self { profiles, source }
    }

    /// Link a Steam account to a user and fetch its rating
    ///
    /// A provider failure still links the account; the profile is stored with
    /// no rating.
    ///
    /// # Arguments
    ///
    /// * `user_id` - User to link
    /// * `display_name` - User's display name
    /// * `steam_input` - 64-bit Steam ID or friend code
    ///
    /// # Returns
    ///
    /// * `RatingResult<PlayerProfile>` - Stored profile
    ///
    /// # Errors
    ///
    /// * `RatingError::InvalidSteamId` - Input is not numeric
    pub async fn link_account(
        &self,
        user_id: UserId,
        display_name: &str,
        steam_input: &str,
    ) -> RatingResult<PlayerProfile> {
        let steam_id = convert_to_steam32(steam_input)
            .ok_or_else(|| RatingError::InvalidSteamId(steam_input.to_string()))?;

        let season_rank = self.fetch_rank(steam_id).await;

        let profile = PlayerProfile {
            user_id,
            steam_id: Some(steam_id),
            display_name: display_name.to_string(),
            mmr: season_rank.and_then(season_rank_to_mmr),
            season_rank,
            updated_at: Utc::now(),
        };
        self.profiles.save_profile(&profile).await?;

        log::info!(
            "Linked user {} to Steam account {} (rating {:?})",
            user_id,
            steam_id,
            profile.mmr
        );
        Ok(profile)
    }

    /// Get a stored profile
    pub async fn profile(&self, user_id: UserId) -> RatingResult<Option<PlayerProfile>> {
        self.profiles.find_profile(user_id).await
    }

    /// Get a user's rating, 0 when unknown
    pub async fn rating_of(&self, user_id: UserId) -> RatingResult<Rating> {
        Ok(self
            .profiles
            .find_profile(user_id)
            .await?
            .map(|profile| profile.rating())
            .unwrap_or(0))
    }

    /// Manually set a user's rating
    ///
    /// # Errors
    ///
    /// * `RatingError::InvalidRating` - Rating is negative or too large
    pub async fn set_rating(
        &self,
        user_id: UserId,
        display_name: &str,
        mmr: i64,
    ) -> RatingResult<PlayerProfile> {
        let rating = Rating::try_from(mmr).map_err(|_| RatingError::InvalidRating(mmr))?;

        let mut profile = match self.profiles.find_profile(user_id).await? {
            Some(profile) => profile,
            None => PlayerProfile {
                user_id,
                steam_id: None,
                display_name: display_name.to_string(),
                mmr: None,
                season_rank: None,
                updated_at: Utc::now(),
            },
        };
        profile.mmr = Some(rating);
        profile.updated_at = Utc::now();
        self.profiles.save_profile(&profile).await?;

        log::info!("Rating of user {} set to {}", user_id, rating);
        Ok(profile)
    }

    /// Snapshot a user as a lobby participant
    pub async fn participant(
        &self,
        user_id: UserId,
        display_name: &str,
    ) -> RatingResult<Participant> {
        let rating = self.rating_of(user_id).await?;
        Ok(Participant::new(user_id, display_name, rating))
    }

    /// Find the user linked to a Steam account
    pub async fn find_user_by_steam_id(&self, steam_id: SteamId) -> RatingResult<Option<UserId>> {
        self.profiles.find_user_by_steam_id(steam_id).await
    }

    /// Re-fetch the rating of every linked profile
    ///
    /// Profiles the provider has no rating for keep their stored rating.
    pub async fn refresh_all(&self) -> RatingResult<RefreshSummary> {
        let mut summary = RefreshSummary::default();

        for mut profile in self.profiles.linked_profiles().await? {
            let Some(steam_id) = profile.steam_id else {
                continue;
            };
            summary.checked += 1;

            let season_rank = match self.source.fetch_season_rank(steam_id).await {
                Ok(rank) => rank,
                Err(e) => {
                    log::warn!("Rating refresh failed for user {}: {}", profile.user_id, e);
                    summary.failed += 1;
                    continue;
                }
            };

            if let Some(mmr) = season_rank.and_then(season_rank_to_mmr) {
                profile.mmr = Some(mmr);
                profile.season_rank = season_rank;
                profile.updated_at = Utc::now();
                self.profiles.save_profile(&profile).await?;
                summary.updated += 1;
            }
        }

        log::info!(
            "Rating refresh: {} checked, {} updated, {} failed",
            summary.checked,
            summary.updated,
            summary.failed
        );
        Ok(summary)
    }

    async fn fetch_rank(&self, steam_id: SteamId) -> Option<u32> {
        match self.source.fetch_season_rank(steam_id).await {
            Ok(rank) => rank,
            Err(e) => {
                log::warn!("Season rank lookup failed for {}: {}", steam_id, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::MemoryStore, rating::FixedRatingSource};

    fn service(source: FixedRatingSource) -> (RatingService, Arc<FixedRatingSource>) {
        let source = Arc::new(source);
        let service = RatingService::new(Arc::new(MemoryStore::new()), source.clone());
        (service, source)
    }

    #[tokio::test]
    async fn test_link_account_fetches_rating() {
        let (service, _) = service(FixedRatingSource::new().with_rank(39_734_272, 54));

        let profile = service
            .link_account(1, "alpha", "76561198000000000")
            .await
            .expect("link");

        assert_eq!(profile.steam_id, Some(39_734_272));
        assert_eq!(profile.mmr, Some(3619));
        assert_eq!(service.rating_of(1).await.expect("rating"), 3619);
    }

    #[tokio::test]
    async fn test_link_account_without_rank() {
        let (service, _) = service(FixedRatingSource::new());

        let profile = service.link_account(1, "alpha", "1234").await.expect("link");

        assert_eq!(profile.steam_id, Some(1234));
        assert_eq!(profile.mmr, None);
        assert_eq!(service.rating_of(1).await.expect("rating"), 0);
    }

    #[tokio::test]
    async fn test_link_account_invalid_input() {
        let (service, _) = service(FixedRatingSource::new());

        let err = service.link_account(1, "alpha", "abc").await.unwrap_err();
        assert!(matches!(err, RatingError::InvalidSteamId(_)));
    }

    #[tokio::test]
    async fn test_unknown_user_rates_zero() {
        let (service, _) = service(FixedRatingSource::new());
        assert_eq!(service.rating_of(99).await.expect("rating"), 0);

        let participant = service.participant(99, "ghost").await.expect("participant");
        assert_eq!(participant.rating, 0);
    }

    #[tokio::test]
    async fn test_set_rating_keeps_link() {
        let (service, _) = service(FixedRatingSource::new().with_rank(500, 31));
        service.link_account(1, "alpha", "500").await.expect("link");

        let profile = service.set_rating(1, "alpha", 4200).await.expect("set");
        assert_eq!(profile.steam_id, Some(500));
        assert_eq!(service.rating_of(1).await.expect("rating"), 4200);
        assert_eq!(
            service.find_user_by_steam_id(500).await.expect("lookup"),
            Some(1)
        );
    }

    #[tokio::test]
    async fn test_set_rating_rejects_negative() {
        let (service, _) = service(FixedRatingSource::new());
        let err = service.set_rating(1, "alpha", -1).await.unwrap_err();
        assert!(matches!(err, RatingError::InvalidRating(-1)));
    }

    #[tokio::test]
    async fn test_refresh_all_updates_changed_ranks() {
        let (service, source) = service(FixedRatingSource::new().with_rank(10, 11));
        service.link_account(1, "alpha", "10").await.expect("link");
        service.link_account(2, "beta", "20").await.expect("link");
        service.set_rating(3, "gamma", 2000).await.expect("set");

        source.set_rank(10, 80);
        let summary = service.refresh_all().await.expect("refresh");

        assert_eq!(summary.checked, 2);
        assert_eq!(summary.updated, 1);
        assert_eq!(service.rating_of(1).await.expect("rating"), 5650);
        assert_eq!(service.rating_of(2).await.expect("rating"), 0);
        assert_eq!(service.rating_of(3).await.expect("rating"), 2000);
    }
}

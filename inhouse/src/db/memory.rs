//! In-process implementation of the repository traits.

use super::repository::{
    InhouseRatingRepository, ProfileRepository, SettingsRepository, WalletRepository,
};
use crate::{
    lobby::{GuildId, UserId},
    rating::{InhouseRating, PlayerProfile, RatingResult, SteamId},
    settings::{SettingEntry, SettingKey, SettingsResult},
    wallet::{Bet, Payout, Settlement, Side, WalletResult},
};
use async_trait::async_trait;
use std::{
    collections::{BTreeMap, HashMap},
    sync::{Mutex, MutexGuard, PoisonError},
};

/// In-memory store for tests and runs without a database
///
/// Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    profiles: Mutex<BTreeMap<UserId, PlayerProfile>>,
    inhouse: Mutex<HashMap<(GuildId, UserId), i64>>,
    wallets: Mutex<HashMap<(GuildId, UserId), i64>>,
    bets: Mutex<BTreeMap<(GuildId, UserId), Bet>>,
    settings: Mutex<HashMap<(GuildId, SettingKey), SettingEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn find_profile(&self, user_id: UserId) -> RatingResult<Option<PlayerProfile>> {
        Ok(lock(&self.profiles).get(&user_id).cloned())
    }

    async fn save_profile(&self, profile: &PlayerProfile) -> RatingResult<()> {
        lock(&self.profiles).insert(profile.user_id, profile.clone());
        Ok(())
    }

    async fn linked_profiles(&self) -> RatingResult<Vec<PlayerProfile>> {
        Ok(lock(&self.profiles)
            .values()
            .filter(|profile| profile.steam_id.is_some())
            .cloned()
            .collect())
    }

    async fn find_user_by_steam_id(&self, steam_id: SteamId) -> RatingResult<Option<UserId>> {
        // Ordered by user ID, so the first match is the lowest
        Ok(lock(&self.profiles)
            .values()
            .find(|profile| profile.steam_id == Some(steam_id))
            .map(|profile| profile.user_id))
    }
}

#[async_trait]
impl InhouseRatingRepository for MemoryStore {
    async fn inhouse_rating(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> RatingResult<Option<i64>> {
        Ok(lock(&self.inhouse).get(&(guild_id, user_id)).copied())
    }

    async fn set_inhouse_rating(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        rating: i64,
    ) -> RatingResult<()> {
        lock(&self.inhouse).insert((guild_id, user_id), rating);
        Ok(())
    }

    async fn top_inhouse_ratings(
        &self,
        guild_id: GuildId,
        limit: usize,
    ) -> RatingResult<Vec<InhouseRating>> {
        let mut ratings: Vec<InhouseRating> = lock(&self.inhouse)
            .iter()
            .filter(|((guild, _), _)| *guild == guild_id)
            .map(|(&(guild_id, user_id), &rating)| InhouseRating {
                guild_id,
                user_id,
                rating,
            })
            .collect();

        ratings.sort_by(|a, b| b.rating.cmp(&a.rating).then(a.user_id.cmp(&b.user_id)));
        ratings.truncate(limit);
        Ok(ratings)
    }
}

#[async_trait]
impl WalletRepository for MemoryStore {
    async fn balance(&self, guild_id: GuildId, user_id: UserId) -> WalletResult<Option<i64>> {
        Ok(lock(&self.wallets).get(&(guild_id, user_id)).copied())
    }

    async fn find_bet(&self, guild_id: GuildId, user_id: UserId) -> WalletResult<Option<Bet>> {
        Ok(lock(&self.bets).get(&(guild_id, user_id)).cloned())
    }

    async fn record_bet(&self, bet: &Bet, new_balance: i64) -> WalletResult<()> {
        // Wallets before bets, everywhere both are held
        let mut wallets = lock(&self.wallets);
        let mut bets = lock(&self.bets);
        wallets.insert((bet.guild_id, bet.user_id), new_balance);
        bets.insert((bet.guild_id, bet.user_id), bet.clone());
        Ok(())
    }

    async fn list_bets(&self, guild_id: GuildId) -> WalletResult<Vec<Bet>> {
        Ok(lock(&self.bets)
            .range((guild_id, UserId::MIN)..=(guild_id, UserId::MAX))
            .map(|(_, bet)| bet.clone())
            .collect())
    }

    async fn settle_bets(
        &self,
        guild_id: GuildId,
        winning_side: Side,
        payout_multiplier: i64,
        default_balance: i64,
    ) -> WalletResult<Settlement> {
        let mut wallets = lock(&self.wallets);
        let mut bets = lock(&self.bets);

        let keys: Vec<(GuildId, UserId)> = bets
            .range((guild_id, UserId::MIN)..=(guild_id, UserId::MAX))
            .map(|(key, _)| *key)
            .collect();

        let mut payouts = Vec::new();
        for key in &keys {
            let Some(bet) = bets.remove(key) else {
                continue;
            };
            if bet.side != winning_side {
                continue;
            }

            let payout = bet.amount * payout_multiplier;
            let balance = wallets.entry(*key).or_insert(default_balance);
            *balance += payout;

            payouts.push(Payout {
                user_id: bet.user_id,
                nickname: bet.nickname,
                stake: bet.amount,
                payout,
                new_balance: *balance,
            });
        }

        Ok(Settlement {
            payouts,
            cleared: keys.len() as u64,
        })
    }

    async fn clear_all_bets(&self) -> WalletResult<u64> {
        let mut bets = lock(&self.bets);
        let cleared = bets.len() as u64;
        bets.clear();
        Ok(cleared)
    }
}

#[async_trait]
impl SettingsRepository for MemoryStore {
    async fn setting(
        &self,
        guild_id: GuildId,
        key: SettingKey,
    ) -> SettingsResult<Option<SettingEntry>> {
        Ok(lock(&self.settings).get(&(guild_id, key)).cloned())
    }

    async fn save_setting(&self, entry: &SettingEntry) -> SettingsResult<()> {
        lock(&self.settings).insert((entry.guild_id, entry.key), entry.clone());
        Ok(())
    }

    async fn settings(&self, guild_id: GuildId) -> SettingsResult<Vec<SettingEntry>> {
        Ok(lock(&self.settings)
            .values()
            .filter(|entry| entry.guild_id == guild_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn bet(guild_id: GuildId, user_id: UserId) -> Bet {
        Bet {
            guild_id,
            user_id,
            side: Side::Radiant,
            amount: 10,
            nickname: format!("user{}", user_id),
            placed_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_bets_are_scoped_per_guild() {
        let store = MemoryStore::new();
        store.record_bet(&bet(1, 5), 990).await.expect("record");
        store.record_bet(&bet(1, 2), 990).await.expect("record");
        store.record_bet(&bet(2, 5), 990).await.expect("record");

        let guild_one = store.list_bets(1).await.expect("list");
        assert_eq!(
            guild_one.iter().map(|b| b.user_id).collect::<Vec<_>>(),
            vec![2, 5]
        );

        let settlement = store
            .settle_bets(1, Side::Dire, 2, 1000)
            .await
            .expect("settle");
        assert_eq!(settlement.cleared, 2);
        assert!(settlement.payouts.is_empty());
        assert_eq!(store.list_bets(2).await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn test_record_bet_writes_balance_and_bet() {
        let store = MemoryStore::new();
        store.record_bet(&bet(1, 4), 990).await.expect("record");

        assert_eq!(store.balance(1, 4).await.expect("balance"), Some(990));
        assert_eq!(
            store.find_bet(1, 4).await.expect("find").map(|b| b.amount),
            Some(10)
        );
    }

    #[tokio::test]
    async fn test_settle_credits_winners_from_default_balance() {
        let store = MemoryStore::new();
        store.record_bet(&bet(1, 3), 990).await.expect("record");
        // Bet stored without a wallet row pays on top of the default
        store.bets.lock().expect("bets").insert((1, 8), bet(1, 8));

        let settlement = store
            .settle_bets(1, Side::Radiant, 2, 1000)
            .await
            .expect("settle");

        assert_eq!(settlement.cleared, 2);
        assert_eq!(
            settlement
                .payouts
                .iter()
                .map(|p| (p.user_id, p.new_balance))
                .collect::<Vec<_>>(),
            vec![(3, 1010), (8, 1020)]
        );
        assert!(store.list_bets(1).await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn test_steam_lookup_prefers_lowest_user() {
        let store = MemoryStore::new();
        for user_id in [9, 4] {
            store
                .save_profile(&PlayerProfile {
                    user_id,
                    steam_id: Some(77),
                    display_name: "dup".into(),
                    mmr: None,
                    season_rank: None,
                    updated_at: Utc::now(),
                })
                .await
                .expect("save");
        }

        assert_eq!(store.find_user_by_steam_id(77).await.expect("find"), Some(4));
        assert_eq!(store.find_user_by_steam_id(78).await.expect("find"), None);
    }

    #[tokio::test]
    async fn test_leaderboard_ties_break_by_user() {
        let store = MemoryStore::new();
        store.set_inhouse_rating(1, 3, 1100).await.expect("set");
        store.set_inhouse_rating(1, 1, 1100).await.expect("set");
        store.set_inhouse_rating(1, 2, 1200).await.expect("set");
        store.set_inhouse_rating(2, 9, 9000).await.expect("set");

        let top = store.top_inhouse_ratings(1, 2).await.expect("top");
        assert_eq!(
            top.iter().map(|r| r.user_id).collect::<Vec<_>>(),
            vec![2, 1]
        );
    }
}

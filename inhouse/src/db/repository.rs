//! Repository trait definitions for testability and dependency injection.
//!
//! This module provides trait-based abstractions over storage, so services
//! can run against PostgreSQL or the in-memory store.

use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{
    lobby::{GuildId, Rating, UserId},
    rating::{InhouseRating, PlayerProfile, RatingResult, SteamId},
    settings::{SettingEntry, SettingKey, SettingsResult},
    wallet::{Bet, Payout, Settlement, Side, WalletResult},
};

/// Trait for player profile storage
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find a profile by user ID
    async fn find_profile(&self, user_id: UserId) -> RatingResult<Option<PlayerProfile>>;

    /// Insert or replace a profile
    async fn save_profile(&self, profile: &PlayerProfile) -> RatingResult<()>;

    /// Profiles with a linked Steam account
    async fn linked_profiles(&self) -> RatingResult<Vec<PlayerProfile>>;

    /// User linked to a Steam account; the lowest user ID wins if several are
    async fn find_user_by_steam_id(&self, steam_id: SteamId) -> RatingResult<Option<UserId>>;
}

/// Trait for inhouse rating storage
#[async_trait]
pub trait InhouseRatingRepository: Send + Sync {
    /// Stored inhouse rating
    async fn inhouse_rating(&self, guild_id: GuildId, user_id: UserId)
    -> RatingResult<Option<i64>>;

    /// Insert or replace an inhouse rating
    async fn set_inhouse_rating(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        rating: i64,
    ) -> RatingResult<()>;

    /// Highest ratings of a guild, ties broken by user ID
    async fn top_inhouse_ratings(
        &self,
        guild_id: GuildId,
        limit: usize,
    ) -> RatingResult<Vec<InhouseRating>>;
}

/// Trait for wallet and bet storage
#[async_trait]
pub trait WalletRepository: Send + Sync {
    /// Stored balance
    async fn balance(&self, guild_id: GuildId, user_id: UserId) -> WalletResult<Option<i64>>;

    /// Open bet of a user
    async fn find_bet(&self, guild_id: GuildId, user_id: UserId) -> WalletResult<Option<Bet>>;

    /// Insert or replace a bet together with the bettor's new balance
    ///
    /// Either both writes land or neither does.
    async fn record_bet(&self, bet: &Bet, new_balance: i64) -> WalletResult<()>;

    /// Open bets of a guild, ordered by user ID
    async fn list_bets(&self, guild_id: GuildId) -> WalletResult<Vec<Bet>>;

    /// Credit winning bets and delete every open bet of a guild in one step
    ///
    /// # Arguments
    ///
    /// * `guild_id` - Guild whose bets are settled
    /// * `winning_side` - Side whose bets are paid
    /// * `payout_multiplier` - Multiple of the stake credited to a winner
    /// * `default_balance` - Starting balance of a wallet that was never stored
    async fn settle_bets(
        &self,
        guild_id: GuildId,
        winning_side: Side,
        payout_multiplier: i64,
        default_balance: i64,
    ) -> WalletResult<Settlement>;

    /// Delete open bets of every guild
    async fn clear_all_bets(&self) -> WalletResult<u64>;
}

/// Trait for guild settings storage
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Stored setting
    async fn setting(&self, guild_id: GuildId, key: SettingKey)
    -> SettingsResult<Option<SettingEntry>>;

    /// Insert or replace a setting
    async fn save_setting(&self, entry: &SettingEntry) -> SettingsResult<()>;

    /// Every stored setting of a guild
    async fn settings(&self, guild_id: GuildId) -> SettingsResult<Vec<SettingEntry>>;
}

/// PostgreSQL implementation of every repository trait
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn profile_from_row(row: &PgRow) -> PlayerProfile {
    PlayerProfile {
        user_id: row.get("user_id"),
        steam_id: row.get("steam_id"),
        display_name: row.get("display_name"),
        mmr: row
            .get::<Option<i64>, _>("mmr")
            .and_then(|mmr| Rating::try_from(mmr).ok()),
        season_rank: row
            .get::<Option<i64>, _>("season_rank")
            .and_then(|rank| u32::try_from(rank).ok()),
        updated_at: row.get::<chrono::NaiveDateTime, _>("updated_at").and_utc(),
    }
}

fn bet_from_row(row: &PgRow) -> WalletResult<Bet> {
    Ok(Bet {
        guild_id: row.get("guild_id"),
        user_id: row.get("user_id"),
        side: row.get::<String, _>("side").parse::<Side>()?,
        amount: row.get("amount"),
        nickname: row.get("nickname"),
        placed_at: row.get::<chrono::NaiveDateTime, _>("placed_at").and_utc(),
    })
}

fn setting_from_row(row: &PgRow) -> SettingsResult<SettingEntry> {
    Ok(SettingEntry {
        guild_id: row.get("guild_id"),
        key: row.get::<String, _>("key").parse()?,
        value: row.get("value"),
        set_by: row.get("set_by"),
        server_name: row.get("server_name"),
        set_at: row.get::<chrono::NaiveDateTime, _>("set_at").and_utc(),
    })
}

#[async_trait]
impl ProfileRepository for PgStore {
    async fn find_profile(&self, user_id: UserId) -> RatingResult<Option<PlayerProfile>> {
        let row = sqlx::query(
            "SELECT user_id, steam_id, display_name, mmr, season_rank, updated_at
             FROM player_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(profile_from_row))
    }

    async fn save_profile(&self, profile: &PlayerProfile) -> RatingResult<()> {
        sqlx::query(
            "INSERT INTO player_profiles (user_id, steam_id, display_name, mmr, season_rank, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (user_id) DO UPDATE SET
                 steam_id = EXCLUDED.steam_id,
                 display_name = EXCLUDED.display_name,
                 mmr = EXCLUDED.mmr,
                 season_rank = EXCLUDED.season_rank,
                 updated_at = EXCLUDED.updated_at",
        )
        .bind(profile.user_id)
        .bind(profile.steam_id)
        .bind(&profile.display_name)
        .bind(profile.mmr.map(i64::from))
        .bind(profile.season_rank.map(i64::from))
        .bind(profile.updated_at.naive_utc())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn linked_profiles(&self) -> RatingResult<Vec<PlayerProfile>> {
        let rows = sqlx::query(
            "SELECT user_id, steam_id, display_name, mmr, season_rank, updated_at
             FROM player_profiles WHERE steam_id IS NOT NULL ORDER BY user_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(profile_from_row).collect())
    }

    async fn find_user_by_steam_id(&self, steam_id: SteamId) -> RatingResult<Option<UserId>> {
        let row = sqlx::query(
            "SELECT user_id FROM player_profiles WHERE steam_id = $1 ORDER BY user_id LIMIT 1",
        )
        .bind(steam_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.get("user_id")))
    }
}

#[async_trait]
impl InhouseRatingRepository for PgStore {
    async fn inhouse_rating(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> RatingResult<Option<i64>> {
        let row = sqlx::query(
            "SELECT rating FROM inhouse_ratings WHERE guild_id = $1 AND user_id = $2",
        )
        .bind(guild_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.get("rating")))
    }

    async fn set_inhouse_rating(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        rating: i64,
    ) -> RatingResult<()> {
        sqlx::query(
            "INSERT INTO inhouse_ratings (guild_id, user_id, rating, updated_at)
             VALUES ($1, $2, $3, NOW())
             ON CONFLICT (guild_id, user_id) DO UPDATE SET
                 rating = EXCLUDED.rating,
                 updated_at = NOW()",
        )
        .bind(guild_id)
        .bind(user_id)
        .bind(rating)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn top_inhouse_ratings(
        &self,
        guild_id: GuildId,
        limit: usize,
    ) -> RatingResult<Vec<InhouseRating>> {
        let rows = sqlx::query(
            "SELECT guild_id, user_id, rating FROM inhouse_ratings
             WHERE guild_id = $1
             ORDER BY rating DESC, user_id ASC
             LIMIT $2",
        )
        .bind(guild_id)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| InhouseRating {
                guild_id: r.get("guild_id"),
                user_id: r.get("user_id"),
                rating: r.get("rating"),
            })
            .collect())
    }
}

#[async_trait]
impl WalletRepository for PgStore {
    async fn balance(&self, guild_id: GuildId, user_id: UserId) -> WalletResult<Option<i64>> {
        let row = sqlx::query("SELECT balance FROM wallets WHERE guild_id = $1 AND user_id = $2")
            .bind(guild_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get("balance")))
    }

    async fn find_bet(&self, guild_id: GuildId, user_id: UserId) -> WalletResult<Option<Bet>> {
        let row = sqlx::query(
            "SELECT guild_id, user_id, side, amount, nickname, placed_at
             FROM bets WHERE guild_id = $1 AND user_id = $2",
        )
        .bind(guild_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(bet_from_row).transpose()
    }

    async fn record_bet(&self, bet: &Bet, new_balance: i64) -> WalletResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO wallets (guild_id, user_id, balance, updated_at)
             VALUES ($1, $2, $3, NOW())
             ON CONFLICT (guild_id, user_id) DO UPDATE SET
                 balance = EXCLUDED.balance,
                 updated_at = NOW()",
        )
        .bind(bet.guild_id)
        .bind(bet.user_id)
        .bind(new_balance)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO bets (guild_id, user_id, side, amount, nickname, placed_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (guild_id, user_id) DO UPDATE SET
                 side = EXCLUDED.side,
                 amount = EXCLUDED.amount,
                 nickname = EXCLUDED.nickname,
                 placed_at = EXCLUDED.placed_at",
        )
        .bind(bet.guild_id)
        .bind(bet.user_id)
        .bind(bet.side.as_str())
        .bind(bet.amount)
        .bind(&bet.nickname)
        .bind(bet.placed_at.naive_utc())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn list_bets(&self, guild_id: GuildId) -> WalletResult<Vec<Bet>> {
        let rows = sqlx::query(
            "SELECT guild_id, user_id, side, amount, nickname, placed_at
             FROM bets WHERE guild_id = $1 ORDER BY user_id",
        )
        .bind(guild_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(bet_from_row).collect()
    }

    async fn settle_bets(
        &self,
        guild_id: GuildId,
        winning_side: Side,
        payout_multiplier: i64,
        default_balance: i64,
    ) -> WalletResult<Settlement> {
        let mut tx = self.pool.begin().await?;

        // Deleting first locks the rows, so a concurrent bet waits for the commit
        let rows = sqlx::query(
            "DELETE FROM bets WHERE guild_id = $1
             RETURNING guild_id, user_id, side, amount, nickname, placed_at",
        )
        .bind(guild_id)
        .fetch_all(&mut *tx)
        .await?;

        let mut bets = rows.iter().map(bet_from_row).collect::<WalletResult<Vec<_>>>()?;
        bets.sort_by_key(|bet| bet.user_id);

        let mut payouts = Vec::new();
        for bet in bets.iter().filter(|bet| bet.side == winning_side) {
            let payout = bet.amount * payout_multiplier;
            let row = sqlx::query(
                "INSERT INTO wallets (guild_id, user_id, balance, updated_at)
                 VALUES ($1, $2, $3, NOW())
                 ON CONFLICT (guild_id, user_id) DO UPDATE SET
                     balance = wallets.balance + $4,
                     updated_at = NOW()
                 RETURNING balance",
            )
            .bind(guild_id)
            .bind(bet.user_id)
            .bind(default_balance + payout)
            .bind(payout)
            .fetch_one(&mut *tx)
            .await?;

            payouts.push(Payout {
                user_id: bet.user_id,
                nickname: bet.nickname.clone(),
                stake: bet.amount,
                payout,
                new_balance: row.get("balance"),
            });
        }

        tx.commit().await?;

        Ok(Settlement {
            payouts,
            cleared: bets.len() as u64,
        })
    }

    async fn clear_all_bets(&self) -> WalletResult<u64> {
        let result = sqlx::query("DELETE FROM bets").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl SettingsRepository for PgStore {
    async fn setting(
        &self,
        guild_id: GuildId,
        key: SettingKey,
    ) -> SettingsResult<Option<SettingEntry>> {
        let row = sqlx::query(
            "SELECT guild_id, key, value, set_by, server_name, set_at
             FROM guild_settings WHERE guild_id = $1 AND key = $2",
        )
        .bind(guild_id)
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(setting_from_row).transpose()
    }

    async fn save_setting(&self, entry: &SettingEntry) -> SettingsResult<()> {
        sqlx::query(
            "INSERT INTO guild_settings (guild_id, key, value, set_by, server_name, set_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (guild_id, key) DO UPDATE SET
                 value = EXCLUDED.value,
                 set_by = EXCLUDED.set_by,
                 server_name = EXCLUDED.server_name,
                 set_at = EXCLUDED.set_at",
        )
        .bind(entry.guild_id)
        .bind(entry.key.as_str())
        .bind(&entry.value)
        .bind(&entry.set_by)
        .bind(&entry.server_name)
        .bind(entry.set_at.naive_utc())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn settings(&self, guild_id: GuildId) -> SettingsResult<Vec<SettingEntry>> {
        let rows = sqlx::query(
            "SELECT guild_id, key, value, set_by, server_name, set_at
             FROM guild_settings WHERE guild_id = $1",
        )
        .bind(guild_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(setting_from_row).collect()
    }
}

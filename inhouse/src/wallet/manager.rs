//! Wallet manager implementing per-guild balances and match betting.

use super::{
    errors::{WalletError, WalletResult},
    models::{Bet, BetReceipt, Settlement, Side},
};
use crate::{
    db::WalletRepository,
    lobby::{GuildId, UserId},
};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Starting balance of a wallet that was never touched
pub const DEFAULT_WALLET_BALANCE: i64 = 1000;

/// Winning bets are paid this multiple of the stake
pub const PAYOUT_MULTIPLIER: i64 = 2;

/// Wallet manager
///
/// Balance reads and writes for a bet happen under one lock, so concurrent
/// bets from the same user cannot both pass the balance check. Each bet and
/// each settlement reaches the repository as a single atomic write.
#[derive(Clone)]
pub struct WalletManager {
    repository: Arc<dyn WalletRepository>,
    default_balance: i64,
    write_lock: Arc<Mutex<()>>,
}

impl WalletManager {
    /// Create a new wallet manager
    ///
    /// # Arguments
    ///
    /// * `repository` - Wallet and bet storage
    /// * `default_balance` - Balance of a wallet that was never touched
    ///
    /// # Returns
    ///
    /// * `WalletManager` - New wallet manager instance
    pub fn new(repository: Arc<dyn WalletRepository>, default_balance: i64) -> Self {
        Self {
            repository,
            default_balance,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Get a user's balance in a guild
    pub async fn balance(&self, guild_id: GuildId, user_id: UserId) -> WalletResult<i64> {
        Ok(self
            .repository
            .balance(guild_id, user_id)
            .await?
            .unwrap_or(self.default_balance))
    }

    /// Place or raise a bet on the guild's current match
    ///
    /// # Arguments
    ///
    /// * `guild_id` - Guild ID
    /// * `user_id` - Bettor
    /// * `side` - Team the bet is on
    /// * `amount` - Total stake after this call
    /// * `nickname` - Bettor's display name
    ///
    /// # Returns
    ///
    /// * `WalletResult<BetReceipt>` - Stakes and balances before and after
    ///
    /// # Errors
    ///
    /// * `WalletError::InvalidAmount` - Amount is not positive
    /// * `WalletError::SideLocked` - Existing bet is on the other side
    /// * `WalletError::MustIncrease` - Amount does not exceed the existing bet
    /// * `WalletError::InsufficientBalance` - Not enough coins for the new stake
    pub async fn place_bet(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        side: Side,
        amount: i64,
        nickname: &str,
    ) -> WalletResult<BetReceipt> {
        if amount <= 0 {
            return Err(WalletError::InvalidAmount(amount));
        }

        let _guard = self.write_lock.lock().await;

        let existing = self.repository.find_bet(guild_id, user_id).await?;
        let previous_amount = match &existing {
            Some(bet) if bet.side != side => {
                return Err(WalletError::SideLocked { existing: bet.side });
            }
            Some(bet) if amount <= bet.amount => {
                return Err(WalletError::MustIncrease {
                    previous: bet.amount,
                });
            }
            Some(bet) => bet.amount,
            None => 0,
        };

        // Raising a bet only debits the difference
        let debit = amount - previous_amount;
        let old_balance = self.balance(guild_id, user_id).await?;
        if old_balance < debit {
            return Err(WalletError::InsufficientBalance {
                available: old_balance,
                required: debit,
            });
        }

        let new_balance = old_balance - debit;
        let bet = Bet {
            guild_id,
            user_id,
            side,
            amount,
            nickname: nickname.to_string(),
            placed_at: Utc::now(),
        };
        self.repository.record_bet(&bet, new_balance).await?;

        log::info!(
            "Guild {}: user {} bet {} on {} (was {})",
            guild_id,
            user_id,
            amount,
            side,
            previous_amount
        );

        Ok(BetReceipt {
            user_id,
            side,
            amount,
            previous_amount,
            old_balance,
            new_balance,
            updated: existing.is_some(),
        })
    }

    /// Open bets of a guild
    pub async fn open_bets(&self, guild_id: GuildId) -> WalletResult<Vec<Bet>> {
        self.repository.list_bets(guild_id).await
    }

    /// Pay out winning bets and drop every open bet of a guild
    ///
    /// Payment and clearing happen in one repository call under the write
    /// lock, so no bet can be placed between them.
    ///
    /// # Returns
    ///
    /// * `WalletResult<Settlement>` - One payout per winning bet and the number of bets cleared
    pub async fn settle(&self, guild_id: GuildId, winning_side: Side) -> WalletResult<Settlement> {
        let _guard = self.write_lock.lock().await;
        let settlement = self
            .repository
            .settle_bets(guild_id, winning_side, PAYOUT_MULTIPLIER, self.default_balance)
            .await?;

        log::info!(
            "Guild {}: {} won, {} of {} bet(s) paid",
            guild_id,
            winning_side,
            settlement.payouts.len(),
            settlement.cleared
        );
        Ok(settlement)
    }

    /// Drop open bets of every guild
    pub async fn clear_all_bets(&self) -> WalletResult<u64> {
        let _guard = self.write_lock.lock().await;
        let cleared = self.repository.clear_all_bets().await?;
        log::info!("Cleared {} open bet(s)", cleared);
        Ok(cleared)
    }
}

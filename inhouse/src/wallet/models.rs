//! Wallet data models.

use super::errors::WalletError;
use crate::lobby::{GuildId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Team a bet is placed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Radiant,
    Dire,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Radiant => "radiant",
            Side::Dire => "dire",
        }
    }

    pub fn opposite(&self) -> Side {
        match self {
            Side::Radiant => Side::Dire,
            Side::Dire => Side::Radiant,
        }
    }

    /// Winning side of a match
    pub fn winner(radiant_win: bool) -> Side {
        if radiant_win { Side::Radiant } else { Side::Dire }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Radiant => write!(f, "Radiant"),
            Side::Dire => write!(f, "Dire"),
        }
    }
}

impl FromStr for Side {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "radiant" => Ok(Side::Radiant),
            "dire" => Ok(Side::Dire),
            _ => Err(WalletError::InvalidSide(s.to_string())),
        }
    }
}

/// Open bet on the current match of a guild
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bet {
    pub guild_id: GuildId,
    pub user_id: UserId,
    pub side: Side,
    pub amount: i64,
    pub nickname: String,
    pub placed_at: DateTime<Utc>,
}

/// Outcome of placing or raising a bet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BetReceipt {
    pub user_id: UserId,
    pub side: Side,
    pub amount: i64,
    /// Stake before this call, 0 for a new bet
    pub previous_amount: i64,
    pub old_balance: i64,
    pub new_balance: i64,
    /// An existing bet was raised
    pub updated: bool,
}

/// Credit paid to a winning bettor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payout {
    pub user_id: UserId,
    pub nickname: String,
    pub stake: i64,
    pub payout: i64,
    pub new_balance: i64,
}

/// Result of settling a guild's open bets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settlement {
    /// One entry per winning bet, ordered by user ID
    pub payouts: Vec<Payout>,
    /// Bets removed, winners and losers alike
    pub cleared: u64,
}

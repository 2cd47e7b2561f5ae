//! Wallet module providing per-guild coin balances and match betting.
//!
//! This module implements:
//! - Balances scoped per guild, starting at a configurable default
//! - One open bet per user and guild, locked to its side and raise-only
//! - Resolution paying winning bets twice their stake
//!
//! ## Example
//!
//! ```no_run
//! use inhouse::db::MemoryStore;
//! use inhouse::wallet::{Side, WalletManager};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let wallet = WalletManager::new(Arc::new(MemoryStore::new()), 1000);
//!
//!     let receipt = wallet.place_bet(1, 42, Side::Radiant, 250, "captain").await?;
//!     println!("Balance went from {} to {}", receipt.old_balance, receipt.new_balance);
//!
//!     let settlement = wallet.settle(1, Side::Radiant).await?;
//!     println!("Paid {} winning bet(s)", settlement.payouts.len());
//!
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{WalletError, WalletResult};
pub use manager::{DEFAULT_WALLET_BALANCE, PAYOUT_MULTIPLIER, WalletManager};
pub use models::{Bet, BetReceipt, Payout, Settlement, Side};

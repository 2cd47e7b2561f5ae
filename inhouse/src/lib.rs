//! # Inhouse
//!
//! Lobby core for community 5v5 inhouse matches: a per-guild roster of ten
//! rated players, balanced team generation, captain drafts and reroll cursors,
//! with the ratings, betting and settings that surround a lobby.
//!
//! ## Architecture
//!
//! Each guild's lobby runs as its own actor task holding the roster and the
//! active rotation. Everything else is a service over repository traits, so
//! the same code runs against PostgreSQL or the in-memory store.
//!
//! ## Core Modules
//!
//! - [`lobby`]: Roster, split and captain enumerators, rotation cursors, actors
//! - [`rating`]: Season rank ratings and per-guild inhouse ratings
//! - [`wallet`]: Coin balances and match betting
//! - [`matches`]: Applying finished match results
//! - [`settings`]: Per-guild prefix, password and mode with an audit trail
//! - [`auth`]: Admin policy and bridge token
//! - [`command`]: Chat command parsing and help text
//! - [`stratz`]: Rating and match provider client
//! - [`db`]: Database pool and repositories
//!
//! ## Example
//!
//! ```
//! use inhouse::lobby::{Participant, enumerate_splits};
//!
//! let players: Vec<Participant> = (1..=10)
//!     .map(|id| Participant::new(id, format!("player{}", id), 1000 + id as u32 * 100))
//!     .collect();
//!
//! let splits = enumerate_splits(&players).unwrap();
//! assert_eq!(splits.len(), 252);
//!
//! // Team sums of 7700 and 7800 are the closest reachable
//! assert_eq!(splits.best().unwrap().rating_gap(), 100);
//! ```

/// Admin policy and bridge token verification.
pub mod auth;

/// Chat command parsing.
pub mod command;

/// Database pool and repositories.
pub mod db;

/// Per-guild lobbies, team balancing and captain drafts.
pub mod lobby;
pub use lobby::{
    GuildId, InhouseMode, LobbyError, LobbyManager, Participant, Rating, UserId,
    enumerate_captain_pairs, enumerate_splits,
};

/// Finished match reporting.
pub mod matches;

/// External and inhouse ratings.
pub mod rating;

/// Guild settings.
pub mod settings;

/// STRATZ API client.
pub mod stratz;

/// Coin balances and betting.
pub mod wallet;

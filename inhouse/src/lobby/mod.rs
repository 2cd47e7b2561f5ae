//! Lobby module providing team balancing, captain drafts and the per-guild actor model.
//!
//! This module implements:
//! - Roster store: up to 10 rated participants per guild
//! - Balanced-split enumerator: all 252 labeled 5v5 splits ranked by fairness
//! - Captain-pair enumerator: all 45 captain pairs ranked by rating closeness
//! - Rotation cursors: reroll through ranked alternatives in regular and draft mode
//! - LobbyActor / LobbyManager: one Tokio task per guild, spawned on demand
//!
//! ## Architecture
//!
//! Each lobby runs in a separate Tokio task with an mpsc message inbox, so
//! events for one guild are applied one at a time. Different guilds share no
//! state. The LobbyManager owns the registry of handles and tears lobbies
//! down explicitly.
//!
//! ## Example
//!
//! ```no_run
//! use inhouse::lobby::{InhouseMode, LobbyManager, Participant};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = LobbyManager::default();
//!     let lobby = manager
//!         .open_lobby(1, InhouseMode::Regular, "penguin".to_string())
//!         .await;
//!
//!     for id in 1..=10 {
//!         lobby
//!             .join(Participant::new(id, format!("player{}", id), 2000 + id as u32 * 100))
//!             .await?;
//!     }
//!
//!     let teams = lobby.generate().await?;
//!     println!("{}", teams.roll_label());
//!     Ok(())
//! }
//! ```

pub mod actor;
pub mod balance;
pub mod captains;
mod combinations;
pub mod config;
pub mod entities;
pub mod errors;
pub mod manager;
pub mod messages;
pub mod rotation;
pub mod state;

pub use actor::{LobbyActor, LobbyHandle};
pub use balance::{Split, enumerate_splits};
pub use captains::{CaptainPairing, enumerate_captain_pairs};
pub use config::{InhouseMode, LobbyConfig};
pub use entities::{
    GuildId, LOBBY_SIZE, Participant, RankedAlternatives, Rating, Roster, TEAM_SIZE, UserId,
};
pub use errors::{LobbyError, LobbyResult};
pub use manager::LobbyManager;
pub use messages::{
    AlternativeView, BatchOutcome, DraftView, LeaveOutcome, LobbyMessage, LobbyView,
    RejectedEntry, TeamsView,
};
pub use rotation::{DEFAULT_DRAFT_MAX_ROLLS, DEFAULT_MAX_ROLLS, DraftCursor, RotationCursor};
pub use state::{Lobby, Rotation};

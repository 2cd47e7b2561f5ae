//! Rating module: external ratings for balancing and inhouse ratings from
//! reported matches.
//!
//! This module implements:
//! - Season rank to rating table and Steam ID normalization
//! - RatingSource trait for the external provider
//! - RatingService: account linking, lookups, manual overrides, refresh
//! - InhouseRatingService: per-guild win/loss rating and leaderboard

pub mod config;
pub mod errors;
pub mod inhouse;
pub mod models;
pub mod rank;
pub mod service;
pub mod source;

pub use config::InhouseRatingConfig;
pub use errors::{RatingError, RatingResult};
pub use inhouse::InhouseRatingService;
pub use models::{InhouseRating, PlayerProfile, RatingChange, RefreshSummary, SteamId};
pub use rank::{STEAM64_OFFSET, convert_to_steam32, season_rank_to_mmr};
pub use service::RatingService;
pub use source::{FixedRatingSource, RatingSource};

//! Season rank to rating mapping and Steam ID normalization.

use super::models::SteamId;
use crate::lobby::Rating;

/// Offset between 64-bit Steam IDs and 32-bit account IDs
pub const STEAM64_OFFSET: i64 = 76_561_197_960_265_728;

/// Rating assigned to every rank at or above [`IMMORTAL_SEASON_RANK`]
pub const IMMORTAL_RATING: Rating = 5650;

/// First season rank of the top medal, which has no stars
pub const IMMORTAL_SEASON_RANK: u32 = 80;

/// Estimated rating per `(medal, stars)` season rank
pub const SEASON_RANK_MMR: [(u32, Rating); 35] = [
    (11, 77),
    (12, 231),
    (13, 385),
    (14, 539),
    (15, 693),
    (21, 847),
    (22, 1001),
    (23, 1155),
    (24, 1309),
    (25, 1463),
    (31, 1594),
    (32, 1749),
    (33, 1953),
    (34, 2081),
    (35, 2208),
    (41, 2387),
    (42, 2541),
    (43, 2695),
    (44, 2849),
    (45, 3003),
    (51, 3157),
    (52, 3311),
    (53, 3465),
    (54, 3619),
    (55, 3772),
    (61, 3927),
    (62, 4081),
    (63, 4235),
    (64, 4389),
    (65, 4542),
    (71, 4720),
    (72, 4920),
    (73, 5120),
    (74, 5320),
    (75, 5520),
];

/// Map a season rank to an estimated rating
///
/// # Returns
///
/// * `Option<Rating>` - `None` for ranks outside the table below the top medal
pub fn season_rank_to_mmr(season_rank: u32) -> Option<Rating> {
    if season_rank >= IMMORTAL_SEASON_RANK {
        return Some(IMMORTAL_RATING);
    }

    SEASON_RANK_MMR
        .iter()
        .find(|(rank, _)| *rank == season_rank)
        .map(|(_, mmr)| *mmr)
}

/// Normalize a Steam ID or friend code to a 32-bit account ID
///
/// Spaces are ignored. 64-bit IDs are reduced by [`STEAM64_OFFSET`]; smaller
/// values are taken as account IDs already.
///
/// # Returns
///
/// * `Option<SteamId>` - `None` if the input is not an integer
pub fn convert_to_steam32(input: &str) -> Option<SteamId> {
    let cleaned: String = input.chars().filter(|c| *c != ' ').collect();
    let steam_id: i64 = cleaned.parse().ok()?;

    if steam_id > STEAM64_OFFSET {
        Some(steam_id - STEAM64_OFFSET)
    } else {
        Some(steam_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_table_lookup() {
        assert_eq!(season_rank_to_mmr(11), Some(77));
        assert_eq!(season_rank_to_mmr(35), Some(2208));
        assert_eq!(season_rank_to_mmr(55), Some(3772));
        assert_eq!(season_rank_to_mmr(75), Some(5520));
    }

    #[test]
    fn test_rank_outside_table() {
        assert_eq!(season_rank_to_mmr(0), None);
        assert_eq!(season_rank_to_mmr(16), None);
        assert_eq!(season_rank_to_mmr(76), None);
    }

    #[test]
    fn test_top_medal_fallback() {
        assert_eq!(season_rank_to_mmr(80), Some(5650));
        assert_eq!(season_rank_to_mmr(84), Some(5650));
    }

    #[test]
    fn test_table_is_monotonic() {
        assert!(SEASON_RANK_MMR.windows(2).all(|w| w[0].1 < w[1].1));
    }

    #[test]
    fn test_convert_steam64() {
        assert_eq!(convert_to_steam32("76561198000000000"), Some(39_734_272));
    }

    #[test]
    fn test_convert_friend_code() {
        assert_eq!(convert_to_steam32("123456789"), Some(123_456_789));
        assert_eq!(convert_to_steam32(" 1234 5678 "), Some(12_345_678));
    }

    #[test]
    fn test_convert_offset_itself_is_kept() {
        assert_eq!(convert_to_steam32("76561197960265728"), Some(STEAM64_OFFSET));
    }

    #[test]
    fn test_convert_invalid() {
        assert_eq!(convert_to_steam32("not-a-number"), None);
        assert_eq!(convert_to_steam32(""), None);
        assert_eq!(convert_to_steam32("12.5"), None);
    }
}

//! Captain pair enumeration for captain-draft lobbies.

use super::{
    combinations::Combinations,
    entities::{LOBBY_SIZE, Participant, RankedAlternatives, Rating, ensure_full},
    errors::LobbyResult,
};
use serde::Serialize;

/// Two captains and the eight players they draft from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptainPairing {
    /// Lower-rated captain first
    pub captains: (Participant, Participant),
    /// Remaining participants, ascending by rating
    pub pool: Vec<Participant>,
    closeness: Rating,
}

impl CaptainPairing {
    /// Absolute rating difference between the two captains
    pub fn closeness(&self) -> Rating {
        self.closeness
    }
}

/// Enumerate all 45 captain pairs of a full roster, closest ratings first.
///
/// Participants are stably sorted by rating ascending before pairing; the
/// order only fixes enumeration and does not limit which pairs appear.
///
/// # Errors
///
/// * `LobbyError::InvalidRosterSize` - Roster does not hold exactly 10 participants
pub fn enumerate_captain_pairs(
    roster: &[Participant],
) -> LobbyResult<RankedAlternatives<CaptainPairing>> {
    ensure_full(roster)?;

    let mut sorted = roster.to_vec();
    sorted.sort_by_key(|p| p.rating);

    let pairings = Combinations::new(LOBBY_SIZE, 2)
        .map(|pair| {
            let (first, second) = (&sorted[pair[0]], &sorted[pair[1]]);
            let pool = sorted
                .iter()
                .enumerate()
                .filter(|(index, _)| !pair.contains(index))
                .map(|(_, p)| p.clone())
                .collect();

            CaptainPairing {
                captains: (first.clone(), second.clone()),
                pool,
                closeness: first.rating.abs_diff(second.rating),
            }
        })
        .collect();

    Ok(RankedAlternatives::rank_by(
        pairings,
        CaptainPairing::closeness,
    ))
}

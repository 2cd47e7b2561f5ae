//! Balanced 5v5 split enumeration.

use super::{
    combinations::Combinations,
    entities::{
        LOBBY_SIZE, Participant, RankedAlternatives, Rating, TEAM_SIZE, ensure_full, rating_sum,
    },
    errors::LobbyResult,
};
use serde::Serialize;

/// One labeled way of dividing a full roster into two teams of five.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Split {
    /// "Team One", in roster order
    pub team_a: Vec<Participant>,
    /// "Team Two", the complement of `team_a`, in roster order
    pub team_b: Vec<Participant>,
    rating_gap: u64,
}

impl Split {
    fn new(team_a: Vec<Participant>, team_b: Vec<Participant>) -> Self {
        let rating_gap = rating_sum(&team_a).abs_diff(rating_sum(&team_b));
        Self {
            team_a,
            team_b,
            rating_gap,
        }
    }

    /// Absolute difference between the two team rating sums.
    ///
    /// Both teams have five members, so ordering by this gap is the same as
    /// ordering by the difference of averages, without fractions.
    pub fn rating_gap(&self) -> u64 {
        self.rating_gap
    }

    /// Absolute difference between the two team rating averages
    pub fn fairness(&self) -> f64 {
        self.rating_gap as f64 / TEAM_SIZE as f64
    }

    /// Team One average, truncated toward zero for display
    pub fn team_a_average(&self) -> Rating {
        truncated_average(&self.team_a)
    }

    /// Team Two average, truncated toward zero for display
    pub fn team_b_average(&self) -> Rating {
        truncated_average(&self.team_b)
    }
}

fn truncated_average(team: &[Participant]) -> Rating {
    if team.is_empty() {
        return 0;
    }
    // An average never exceeds the largest member rating, so it fits back into Rating
    Rating::try_from(rating_sum(team) / team.len() as u64).unwrap_or(Rating::MAX)
}

/// Enumerate every labeled 5v5 split of a full roster, fairest first.
///
/// Team One is each 5-element subset in lexicographic roster-index order and
/// Team Two is its complement, so all 252 labeled splits are produced (each
/// unordered pair of teams appears twice, once per labeling). Ties keep
/// generation order.
///
/// # Errors
///
/// * `LobbyError::InvalidRosterSize` - Roster does not hold exactly 10 participants
pub fn enumerate_splits(roster: &[Participant]) -> LobbyResult<RankedAlternatives<Split>> {
    ensure_full(roster)?;

    let splits = Combinations::new(LOBBY_SIZE, TEAM_SIZE)
        .map(|chosen| {
            let mut on_team_a = [false; LOBBY_SIZE];
            for index in chosen {
                on_team_a[index] = true;
            }

            let (team_a, team_b): (Vec<_>, Vec<_>) = roster
                .iter()
                .zip(on_team_a)
                .partition(|(_, in_a)| *in_a);

            Split::new(
                team_a.into_iter().map(|(p, _)| p.clone()).collect(),
                team_b.into_iter().map(|(p, _)| p.clone()).collect(),
            )
        })
        .collect();

    Ok(RankedAlternatives::rank_by(splits, Split::rating_gap))
}

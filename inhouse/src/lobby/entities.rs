//! Lobby entities: participants, the roster, and ranked alternatives.

use super::errors::{LobbyError, LobbyResult};
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Chat-platform user ID
pub type UserId = i64;

/// Chat-platform guild (server) ID; one lobby per guild
pub type GuildId = i64;

/// Skill rating captured for a participant
pub type Rating = u32;

/// Number of participants in a full lobby
pub const LOBBY_SIZE: usize = 10;

/// Number of participants per team
pub const TEAM_SIZE: usize = 5;

/// A rated lobby participant.
///
/// The rating is a snapshot taken at join time. Later rating refreshes do not
/// alter a roster that is already assembled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    pub id: UserId,
    pub display_name: String,
    pub rating: Rating,
}

impl Participant {
    pub fn new(id: UserId, display_name: impl Into<String>, rating: Rating) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            rating,
        }
    }
}

impl std::fmt::Display for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.display_name, self.rating)
    }
}

/// Ordered list of up to [`LOBBY_SIZE`] unique participants.
///
/// Insertion order is kept for display; balancing ignores it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= LOBBY_SIZE
    }

    pub fn contains(&self, user_id: UserId) -> bool {
        self.participants.iter().any(|p| p.id == user_id)
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn ids(&self) -> Vec<UserId> {
        self.participants.iter().map(|p| p.id).collect()
    }

    /// Append a participant
    ///
    /// # Errors
    ///
    /// * `LobbyError::RosterFull` - Roster already holds 10 participants
    /// * `LobbyError::AlreadyPresent` - Participant ID already joined
    pub fn add(&mut self, participant: Participant) -> LobbyResult<()> {
        if self.is_full() {
            return Err(LobbyError::RosterFull {
                capacity: LOBBY_SIZE,
            });
        }

        if self.contains(participant.id) {
            return Err(LobbyError::AlreadyPresent(participant.id));
        }

        self.participants.push(participant);
        Ok(())
    }

    /// Remove a participant by ID, returning the removed entry
    ///
    /// # Errors
    ///
    /// * `LobbyError::NotPresent` - No participant with this ID
    pub fn remove(&mut self, user_id: UserId) -> LobbyResult<Participant> {
        let position = self
            .participants
            .iter()
            .position(|p| p.id == user_id)
            .ok_or(LobbyError::NotPresent(user_id))?;

        Ok(self.participants.remove(position))
    }

    /// Remove everyone, returning how many participants were dropped
    pub fn clear(&mut self) -> usize {
        let count = self.participants.len();
        self.participants.clear();
        count
    }
}

/// Fail with `InvalidRosterSize` unless exactly [`LOBBY_SIZE`] participants are given.
pub(crate) fn ensure_full(participants: &[Participant]) -> LobbyResult<()> {
    if participants.len() != LOBBY_SIZE {
        return Err(LobbyError::InvalidRosterSize {
            expected: LOBBY_SIZE,
            actual: participants.len(),
        });
    }
    Ok(())
}

/// Alternatives sorted ascending by a score, ties kept in generation order.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedAlternatives<T> {
    items: Vec<T>,
}

impl<T> RankedAlternatives<T> {
    /// Rank `items` by `key` using a stable sort.
    pub fn rank_by<K: Ord>(mut items: Vec<T>, key: impl FnMut(&T) -> K) -> Self {
        items.sort_by_key(key);
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Top-ranked alternative
    pub fn best(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T> Index<usize> for RankedAlternatives<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<'a, T> IntoIterator for &'a RankedAlternatives<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Sum of ratings, widened so that a full team cannot overflow.
pub(crate) fn rating_sum(participants: &[Participant]) -> u64 {
    participants.iter().map(|p| u64::from(p.rating)).sum()
}

/// Copy of `participants` ordered by rating, highest first (display order).
pub fn sorted_by_rating_desc(participants: &[Participant]) -> Vec<Participant> {
    let mut sorted = participants.to_vec();
    sorted.sort_by(|a, b| b.rating.cmp(&a.rating));
    sorted
}

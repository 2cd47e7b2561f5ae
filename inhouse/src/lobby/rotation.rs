//! Reroll cursors over ranked alternatives.
//!
//! The two lobby modes walk their ranked lists differently:
//!
//! - [`RotationCursor`] (regular mode) counts rolls from 1. Each reroll shows
//!   the next-best split until the roll count reaches `max_rolls`; the reroll
//!   after that jumps back to the best split with the count reset to 1.
//! - [`DraftCursor`] (captain draft) keeps a zero-based index that wraps
//!   modulo `max_rolls + 1`.

use super::{
    balance::{Split, enumerate_splits},
    captains::{CaptainPairing, enumerate_captain_pairs},
    entities::{Participant, RankedAlternatives},
    errors::LobbyResult,
};

/// Default reroll bound for regular lobbies
pub const DEFAULT_MAX_ROLLS: u32 = 5;

/// Default reroll bound for captain-draft lobbies
pub const DEFAULT_DRAFT_MAX_ROLLS: u32 = 3;

/// Cursor over ranked 5v5 splits.
#[derive(Debug, Clone)]
pub struct RotationCursor {
    ranked: RankedAlternatives<Split>,
    roll_count: u32,
    max_rolls: u32,
}

impl RotationCursor {
    /// Enumerate splits for `roster` and point at the best one (roll 1).
    ///
    /// `max_rolls` is clamped to `1..=252`.
    ///
    /// # Errors
    ///
    /// * `LobbyError::InvalidRosterSize` - Roster is not full
    pub fn generate(roster: &[Participant], max_rolls: u32) -> LobbyResult<Self> {
        let ranked = enumerate_splits(roster)?;
        let limit = u32::try_from(ranked.len()).unwrap_or(u32::MAX);

        Ok(Self {
            ranked,
            roll_count: 1,
            max_rolls: max_rolls.clamp(1, limit),
        })
    }

    /// Split currently on display
    pub fn current(&self) -> &Split {
        &self.ranked[self.roll_count as usize - 1]
    }

    /// Advance to the next split, or back to the best one after `max_rolls`.
    pub fn reroll(&mut self) -> &Split {
        if self.roll_count >= self.max_rolls {
            self.roll_count = 1;
        } else {
            self.roll_count += 1;
        }
        self.current()
    }

    pub fn roll_count(&self) -> u32 {
        self.roll_count
    }

    pub fn max_rolls(&self) -> u32 {
        self.max_rolls
    }

    pub fn ranked(&self) -> &RankedAlternatives<Split> {
        &self.ranked
    }
}

/// Cursor over ranked captain pairings.
#[derive(Debug, Clone)]
pub struct DraftCursor {
    ranked: RankedAlternatives<CaptainPairing>,
    index: usize,
    max_rolls: u32,
}

impl DraftCursor {
    /// Enumerate captain pairs for `roster` and point at the closest pair.
    ///
    /// `max_rolls` is clamped so that every index stays within the 45 pairings.
    ///
    /// # Errors
    ///
    /// * `LobbyError::InvalidRosterSize` - Roster is not full
    pub fn generate(roster: &[Participant], max_rolls: u32) -> LobbyResult<Self> {
        let ranked = enumerate_captain_pairs(roster)?;
        let limit = u32::try_from(ranked.len().saturating_sub(1)).unwrap_or(u32::MAX);

        Ok(Self {
            ranked,
            index: 0,
            max_rolls: max_rolls.min(limit),
        })
    }

    /// Pairing currently on display
    pub fn current(&self) -> &CaptainPairing {
        &self.ranked[self.index]
    }

    /// Advance the index modulo `max_rolls + 1`.
    pub fn reroll(&mut self) -> &CaptainPairing {
        self.index = (self.index + 1) % (self.max_rolls as usize + 1);
        self.current()
    }

    /// Zero-based position of the displayed pairing
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn max_rolls(&self) -> u32 {
        self.max_rolls
    }

    pub fn ranked(&self) -> &RankedAlternatives<CaptainPairing> {
        &self.ranked
    }
}

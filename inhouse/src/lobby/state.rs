//! Per-guild lobby context: roster, mode, and the active rotation.

use super::{
    config::{InhouseMode, LobbyConfig},
    entities::{GuildId, LOBBY_SIZE, Participant, Roster, UserId, sorted_by_rating_desc},
    errors::{LobbyError, LobbyResult},
    messages::{
        AlternativeView, BatchOutcome, DraftView, LeaveOutcome, LobbyView, RejectedEntry,
        TeamsView,
    },
    rotation::{DraftCursor, RotationCursor},
};

/// Cached alternatives for the current roster
#[derive(Debug, Clone)]
pub enum Rotation {
    Teams(RotationCursor),
    Draft(DraftCursor),
}

/// One guild's lobby.
///
/// Any roster change or mode change drops the cached rotation, so a reroll
/// afterwards fails with `NoActiveRotation` until teams are generated again.
#[derive(Debug, Clone)]
pub struct Lobby {
    guild_id: GuildId,
    config: LobbyConfig,
    mode: InhouseMode,
    password: String,
    roster: Roster,
    rotation: Option<Rotation>,
}

impl Lobby {
    pub fn new(
        guild_id: GuildId,
        config: LobbyConfig,
        mode: InhouseMode,
        password: impl Into<String>,
    ) -> Self {
        Self {
            guild_id,
            config,
            mode,
            password: password.into(),
            roster: Roster::new(),
            rotation: None,
        }
    }

    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    pub fn mode(&self) -> InhouseMode {
        self.mode
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn has_rotation(&self) -> bool {
        self.rotation.is_some()
    }

    /// Add a participant
    ///
    /// # Errors
    ///
    /// * `LobbyError::RosterFull` - Lobby already holds 10
    /// * `LobbyError::AlreadyPresent` - Participant already joined
    pub fn add(&mut self, participant: Participant) -> LobbyResult<()> {
        self.roster.add(participant)?;
        self.rotation = None;
        Ok(())
    }

    /// Remove a participant
    ///
    /// # Errors
    ///
    /// * `LobbyError::NotPresent` - Participant is not in the lobby
    pub fn remove(&mut self, user_id: UserId) -> LobbyResult<LeaveOutcome> {
        let was_full = self.roster.is_full();
        let removed = self.roster.remove(user_id)?;
        self.rotation = None;

        Ok(LeaveOutcome {
            removed,
            left_full_lobby: was_full && self.roster.len() == LOBBY_SIZE - 1,
            lobby: self.view(),
        })
    }

    /// Add participants one by one, reporting each rejection
    pub fn add_many(&mut self, participants: Vec<Participant>) -> BatchOutcome {
        let mut applied = Vec::new();
        let mut rejected = Vec::new();

        for participant in participants {
            let user_id = participant.id;
            match self.add(participant.clone()) {
                Ok(()) => applied.push(participant),
                Err(e) => rejected.push(RejectedEntry {
                    user_id,
                    reason: e.to_string(),
                }),
            }
        }

        BatchOutcome {
            applied,
            rejected,
            left_full_lobby: false,
            lobby: self.view(),
        }
    }

    /// Remove participants one by one, reporting each rejection
    pub fn remove_many(&mut self, user_ids: Vec<UserId>) -> BatchOutcome {
        let was_full = self.roster.is_full();
        let mut applied = Vec::new();
        let mut rejected = Vec::new();

        for user_id in user_ids {
            match self.roster.remove(user_id) {
                Ok(participant) => applied.push(participant),
                Err(e) => rejected.push(RejectedEntry {
                    user_id,
                    reason: e.to_string(),
                }),
            }
        }

        if !applied.is_empty() {
            self.rotation = None;
        }

        BatchOutcome {
            left_full_lobby: was_full && self.roster.len() == LOBBY_SIZE - 1,
            applied,
            rejected,
            lobby: self.view(),
        }
    }

    /// Clear the roster
    pub fn reset(&mut self) -> usize {
        self.rotation = None;
        self.roster.clear()
    }

    /// Compute alternatives for the current mode and show the best one
    ///
    /// Calling this again without a roster change yields the same result.
    ///
    /// # Errors
    ///
    /// * `LobbyError::InvalidRosterSize` - Roster is not full
    pub fn generate(&mut self) -> LobbyResult<AlternativeView> {
        let participants = self.roster.participants();
        let rotation = match self.mode {
            InhouseMode::Regular => Rotation::Teams(RotationCursor::generate(
                participants,
                self.config.max_rolls,
            )?),
            InhouseMode::Immortal => Rotation::Draft(DraftCursor::generate(
                participants,
                self.config.draft_max_rolls,
            )?),
        };

        let view = self.render(&rotation);
        self.rotation = Some(rotation);

        log::debug!("Lobby {}: generated {} alternatives", self.guild_id, self.mode);
        Ok(view)
    }

    /// Advance the active rotation
    ///
    /// # Errors
    ///
    /// * `LobbyError::NoActiveRotation` - Nothing generated for the current roster
    pub fn reroll(&mut self) -> LobbyResult<AlternativeView> {
        let mut rotation = self.rotation.take().ok_or(LobbyError::NoActiveRotation)?;

        match &mut rotation {
            Rotation::Teams(cursor) => {
                cursor.reroll();
            }
            Rotation::Draft(cursor) => {
                cursor.reroll();
            }
        }

        let view = self.render(&rotation);
        self.rotation = Some(rotation);
        Ok(view)
    }

    /// Alternative currently on display
    pub fn current(&self) -> Option<AlternativeView> {
        self.rotation.as_ref().map(|rotation| self.render(rotation))
    }

    /// Switch modes; the cached rotation is dropped when the mode changes
    pub fn set_mode(&mut self, mode: InhouseMode) {
        if self.mode != mode {
            self.mode = mode;
            self.rotation = None;
        }
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    /// IDs to mention when calling a full lobby to play
    ///
    /// # Errors
    ///
    /// * `LobbyError::InvalidRosterSize` - Lobby is not full
    pub fn alert_targets(&self) -> LobbyResult<Vec<UserId>> {
        if !self.roster.is_full() {
            return Err(LobbyError::InvalidRosterSize {
                expected: LOBBY_SIZE,
                actual: self.roster.len(),
            });
        }
        Ok(self.roster.ids())
    }

    pub fn view(&self) -> LobbyView {
        LobbyView {
            guild_id: self.guild_id,
            mode: self.mode,
            password: self.password.clone(),
            player_count: self.roster.len(),
            capacity: LOBBY_SIZE,
            players: self.roster.participants().to_vec(),
            ready: self.roster.is_full(),
        }
    }

    fn render(&self, rotation: &Rotation) -> AlternativeView {
        match rotation {
            Rotation::Teams(cursor) => {
                let split = cursor.current();
                AlternativeView::Teams(TeamsView {
                    team_one: sorted_by_rating_desc(&split.team_a),
                    team_two: sorted_by_rating_desc(&split.team_b),
                    team_one_average: split.team_a_average(),
                    team_two_average: split.team_b_average(),
                    fairness: split.fairness(),
                    roll: cursor.roll_count(),
                    max_rolls: cursor.max_rolls(),
                    password: self.password.clone(),
                })
            }
            Rotation::Draft(cursor) => {
                let pairing = cursor.current();
                AlternativeView::Draft(DraftView {
                    captains: pairing.captains.clone(),
                    pool: sorted_by_rating_desc(&pairing.pool),
                    closeness: pairing.closeness(),
                    roll: cursor.index(),
                    max_rolls: cursor.max_rolls(),
                    password: self.password.clone(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_lobby(mode: InhouseMode) -> Lobby {
        let mut lobby = Lobby::new(1, LobbyConfig::default(), mode, "penguin");
        for (i, rating) in [1200, 3400, 2100, 5000, 800, 4300, 2900, 3900, 1500, 2600]
            .into_iter()
            .enumerate()
        {
            lobby
                .add(Participant::new(i as i64 + 1, format!("p{}", i + 1), rating))
                .expect("join");
        }
        lobby
    }

    fn teams(view: AlternativeView) -> TeamsView {
        match view {
            AlternativeView::Teams(teams) => teams,
            AlternativeView::Draft(_) => panic!("expected teams"),
        }
    }

    #[test]
    fn test_generate_requires_full_roster() {
        let mut lobby = Lobby::new(1, LobbyConfig::default(), InhouseMode::Regular, "pw");
        lobby.add(Participant::new(1, "solo", 1000)).expect("join");

        assert_eq!(
            lobby.generate(),
            Err(LobbyError::InvalidRosterSize {
                expected: 10,
                actual: 1
            })
        );
    }

    #[test]
    fn test_reroll_before_generate_fails() {
        let mut lobby = full_lobby(InhouseMode::Regular);
        assert_eq!(lobby.reroll(), Err(LobbyError::NoActiveRotation));
    }

    #[test]
    fn test_generate_then_reroll_counts_rolls() {
        let mut lobby = full_lobby(InhouseMode::Regular);

        let first = teams(lobby.generate().expect("generate"));
        assert_eq!(first.roll, 1);
        assert_eq!(first.max_rolls, 5);
        assert_eq!(first.password, "penguin");

        let second = teams(lobby.reroll().expect("reroll"));
        assert_eq!(second.roll, 2);
        assert!(second.fairness >= first.fairness);
    }

    #[test]
    fn test_generate_twice_is_stable() {
        let mut lobby = full_lobby(InhouseMode::Regular);
        let first = lobby.generate().expect("generate");
        lobby.reroll().expect("reroll");
        let again = lobby.generate().expect("generate");

        assert_eq!(first, again);
    }

    #[test]
    fn test_teams_sorted_for_display() {
        let mut lobby = full_lobby(InhouseMode::Regular);
        let view = teams(lobby.generate().expect("generate"));

        assert!(view.team_one.windows(2).all(|w| w[0].rating >= w[1].rating));
        assert!(view.team_two.windows(2).all(|w| w[0].rating >= w[1].rating));
        assert_eq!(view.team_one.len() + view.team_two.len(), 10);
    }

    #[test]
    fn test_mutation_invalidates_rotation() {
        let mut lobby = full_lobby(InhouseMode::Regular);
        lobby.generate().expect("generate");

        let outcome = lobby.remove(3).expect("leave");
        assert!(outcome.left_full_lobby);
        assert!(!lobby.has_rotation());
        assert_eq!(lobby.reroll(), Err(LobbyError::NoActiveRotation));

        lobby.add(Participant::new(42, "late", 2000)).expect("join");
        assert_eq!(lobby.reroll(), Err(LobbyError::NoActiveRotation));
        assert!(lobby.generate().is_ok());
    }

    #[test]
    fn test_failed_mutation_keeps_rotation() {
        let mut lobby = full_lobby(InhouseMode::Regular);
        lobby.generate().expect("generate");

        assert!(lobby.add(Participant::new(99, "extra", 1000)).is_err());
        assert!(lobby.remove(99).is_err());
        assert!(lobby.reroll().is_ok());
    }

    #[test]
    fn test_draft_mode_rerolls_modulo() {
        let mut lobby = full_lobby(InhouseMode::Immortal);

        let mut rolls = Vec::new();
        for step in 0..5 {
            let view = if step == 0 {
                lobby.generate()
            } else {
                lobby.reroll()
            };
            match view.expect("draft view") {
                AlternativeView::Draft(draft) => rolls.push(draft.roll),
                AlternativeView::Teams(_) => panic!("expected draft"),
            }
        }

        assert_eq!(rolls, vec![0, 1, 2, 3, 0]);
    }

    #[test]
    fn test_mode_change_drops_rotation() {
        let mut lobby = full_lobby(InhouseMode::Regular);
        lobby.generate().expect("generate");

        lobby.set_mode(InhouseMode::Regular);
        assert!(lobby.has_rotation());

        lobby.set_mode(InhouseMode::Immortal);
        assert!(!lobby.has_rotation());
        assert!(matches!(lobby.generate(), Ok(AlternativeView::Draft(_))));
    }

    #[test]
    fn test_batch_add_reports_rejections() {
        let mut lobby = Lobby::new(1, LobbyConfig::default(), InhouseMode::Regular, "pw");
        lobby.add(Participant::new(1, "a", 100)).expect("join");

        let outcome = lobby.add_many(vec![
            Participant::new(1, "a", 100),
            Participant::new(2, "b", 200),
        ]);

        assert_eq!(outcome.applied.len(), 1);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].user_id, 1);
        assert_eq!(outcome.lobby.player_count, 2);
    }

    #[test]
    fn test_batch_remove_from_full_lobby() {
        let mut lobby = full_lobby(InhouseMode::Regular);
        let outcome = lobby.remove_many(vec![1, 2, 77]);

        assert_eq!(outcome.applied.len(), 2);
        assert_eq!(outcome.rejected[0].user_id, 77);
        assert!(!outcome.left_full_lobby, "10 to 8 is not a leave at 9/10");
        assert_eq!(outcome.lobby.player_count, 8);
    }

    #[test]
    fn test_batch_remove_of_one_from_full_lobby() {
        let mut lobby = full_lobby(InhouseMode::Regular);
        let outcome = lobby.remove_many(vec![3, 77]);

        assert_eq!(outcome.applied.len(), 1);
        assert!(outcome.left_full_lobby);
        assert_eq!(outcome.lobby.player_count, 9);
    }

    #[test]
    fn test_alert_targets_only_when_full() {
        let mut lobby = full_lobby(InhouseMode::Regular);
        assert_eq!(lobby.alert_targets().expect("full").len(), 10);

        lobby.remove(1).expect("leave");
        assert!(lobby.alert_targets().is_err());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut lobby = full_lobby(InhouseMode::Regular);
        lobby.generate().expect("generate");

        assert_eq!(lobby.reset(), 10);
        assert!(lobby.roster().is_empty());
        assert!(lobby.current().is_none());
    }
}

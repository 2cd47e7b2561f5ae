//! Lobby actor message and view types.

use super::{
    config::InhouseMode,
    entities::{GuildId, Participant, Rating, UserId},
    errors::LobbyResult,
};
use serde::Serialize;
use tokio::sync::oneshot;

/// Messages that can be sent to a LobbyActor
#[derive(Debug)]
pub enum LobbyMessage {
    /// Participant joins (thumbs-up reaction)
    Join {
        participant: Participant,
        response: oneshot::Sender<LobbyResult<LobbyView>>,
    },

    /// Participant leaves (thumbs-down reaction)
    Leave {
        user_id: UserId,
        response: oneshot::Sender<LobbyResult<LeaveOutcome>>,
    },

    /// Add several participants at once
    AddMany {
        participants: Vec<Participant>,
        response: oneshot::Sender<BatchOutcome>,
    },

    /// Remove several participants at once
    RemoveMany {
        user_ids: Vec<UserId>,
        response: oneshot::Sender<BatchOutcome>,
    },

    /// Clear the roster
    Reset {
        response: oneshot::Sender<LobbyView>,
    },

    /// Compute alternatives for the full roster and show the best one
    Generate {
        response: oneshot::Sender<LobbyResult<AlternativeView>>,
    },

    /// Advance to the next alternative
    Reroll {
        response: oneshot::Sender<LobbyResult<AlternativeView>>,
    },

    /// Switch between regular and captain-draft mode
    SetMode {
        mode: InhouseMode,
        response: oneshot::Sender<LobbyView>,
    },

    /// Update the password shown with the lobby
    SetPassword {
        password: String,
        response: oneshot::Sender<LobbyView>,
    },

    /// Get the roster view
    GetView {
        response: oneshot::Sender<LobbyView>,
    },

    /// Get the alternative on display, if any
    GetAlternative {
        response: oneshot::Sender<Option<AlternativeView>>,
    },

    /// Get the IDs to mention once the lobby is full
    AlertTargets {
        response: oneshot::Sender<LobbyResult<Vec<UserId>>>,
    },

    /// Shut the actor down
    Close,
}

/// Roster snapshot for rendering the lobby message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LobbyView {
    pub guild_id: GuildId,
    pub mode: InhouseMode,
    pub password: String,
    pub player_count: usize,
    pub capacity: usize,
    /// Participants in join order
    pub players: Vec<Participant>,
    /// Roster is full and teams can be generated
    pub ready: bool,
}

/// Regular-mode team display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamsView {
    /// Team One, highest rating first
    pub team_one: Vec<Participant>,
    /// Team Two, highest rating first
    pub team_two: Vec<Participant>,
    pub team_one_average: Rating,
    pub team_two_average: Rating,
    pub fairness: f64,
    pub roll: u32,
    pub max_rolls: u32,
    pub password: String,
}

/// Captain-draft display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftView {
    pub captains: (Participant, Participant),
    /// Draft pool, highest rating first
    pub pool: Vec<Participant>,
    pub closeness: Rating,
    pub roll: usize,
    pub max_rolls: u32,
    pub password: String,
}

/// The alternative to render after generate or reroll
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlternativeView {
    Teams(TeamsView),
    Draft(DraftView),
}

impl AlternativeView {
    /// Current roll number as shown in "Roll #n/max"
    pub fn roll_label(&self) -> String {
        match self {
            AlternativeView::Teams(view) => format!("Roll #{}/{}", view.roll, view.max_rolls),
            AlternativeView::Draft(view) => format!("Roll #{}/{}", view.roll, view.max_rolls),
        }
    }
}

/// Result of a single leave
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaveOutcome {
    pub removed: Participant,
    /// The lobby went from 10 to 9, so generate/reroll controls should be cleared
    pub left_full_lobby: bool,
    pub lobby: LobbyView,
}

/// Per-entry rejection in a batch add or remove
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedEntry {
    pub user_id: UserId,
    pub reason: String,
}

/// Result of a batch add or remove
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub applied: Vec<Participant>,
    pub rejected: Vec<RejectedEntry>,
    /// The batch took the lobby from 10 to exactly 9
    pub left_full_lobby: bool,
    pub lobby: LobbyView,
}

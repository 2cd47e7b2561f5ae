//! Lobby API handlers.
//!
//! The bridge calls these on reactions and lobby commands:
//! - thumbs-up / thumbs-down reactions: `join` / `leave`
//! - `!add`, `!remove`, `!reset`: batch roster changes
//! - generate / reroll reactions: team generation and rotation
//! - `!lobby <mode>`, `!alert`: admin controls
//!
//! Players are snapshotted with their stored rating when they join; rating
//! lookups never happen inside the lobby actor.
//!
//! # Examples
//!
//! ```bash
//! curl -X POST http://localhost:6969/api/v1/guilds/1/lobby/join \
//!   -H "Authorization: Bearer TOKEN" \
//!   -H "x-actor-id: 42" -H "x-actor-name: Tidebringer"
//! ```

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use inhouse::{
    auth::Actor,
    lobby::{
        AlternativeView, BatchOutcome, GuildId, InhouseMode, LeaveOutcome, LobbyHandle,
        LobbyView, Participant, UserId,
    },
    settings::ChangeContext,
};
use serde::{Deserialize, Serialize};

use super::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::require_admin,
};
use crate::metrics;

#[derive(Debug, Deserialize)]
pub struct PlayerRef {
    pub user_id: UserId,
    /// Falls back to the stored profile name
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddPlayersRequest {
    pub players: Vec<PlayerRef>,
}

#[derive(Debug, Deserialize)]
pub struct RemovePlayersRequest {
    pub user_ids: Vec<UserId>,
}

#[derive(Debug, Deserialize)]
pub struct SetModeRequest {
    pub mode: String,
}

#[derive(Debug, Serialize)]
pub struct AlertResponse {
    /// Users to mention
    pub user_ids: Vec<UserId>,
    pub password: String,
}

/// Get the guild's lobby, spawning it from the stored settings if needed
pub(crate) async fn lobby_for(state: &AppState, guild_id: GuildId) -> ApiResult<LobbyHandle> {
    if let Some(handle) = state.lobbies.get_lobby(guild_id).await {
        return Ok(handle);
    }

    let mode = state.settings.mode(guild_id).await?;
    let password = state.settings.password(guild_id).await?;
    let handle = state.lobbies.open_lobby(guild_id, mode, password).await;

    metrics::active_lobbies(state.lobbies.active_lobby_count().await);
    Ok(handle)
}

/// Snapshot a user with their stored rating
async fn participant_for(
    state: &AppState,
    user_id: UserId,
    display_name: Option<String>,
) -> ApiResult<Participant> {
    let display_name = match display_name {
        Some(name) => name,
        None => state
            .ratings
            .profile(user_id)
            .await?
            .map(|profile| profile.display_name)
            .unwrap_or_else(|| format!("user{}", user_id)),
    };

    Ok(state.ratings.participant(user_id, &display_name).await?)
}

/// Show the roster.
///
/// # Response
///
/// `200 OK` with the lobby view (players in join order, mode, password).
pub async fn get_lobby(
    State(state): State<AppState>,
    Path(guild_id): Path<GuildId>,
) -> ApiResult<Json<LobbyView>> {
    let lobby = lobby_for(&state, guild_id).await?;
    Ok(Json(lobby.view().await?))
}

/// Join the lobby as the acting user.
///
/// # Errors
///
/// - `409 Conflict`: Lobby is full or the user already joined
pub async fn join(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(guild_id): Path<GuildId>,
) -> ApiResult<Json<LobbyView>> {
    let lobby = lobby_for(&state, guild_id).await?;
    let participant =
        participant_for(&state, actor.user_id, Some(actor.display_name.clone())).await?;

    let view = lobby.join(participant).await?;
    metrics::roster_changes_total("join");
    Ok(Json(view))
}

/// Leave the lobby as the acting user.
///
/// `left_full_lobby` tells the bridge to post the leave notice and clear the
/// generate/reroll reactions.
///
/// # Errors
///
/// - `404 Not Found`: User is not in the lobby
pub async fn leave(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(guild_id): Path<GuildId>,
) -> ApiResult<Json<LeaveOutcome>> {
    let lobby = lobby_for(&state, guild_id).await?;

    let outcome = lobby.leave(actor.user_id).await?;
    metrics::roster_changes_total("leave");
    Ok(Json(outcome))
}

/// Add mentioned players; each rejection is reported separately.
pub async fn add(
    State(state): State<AppState>,
    Path(guild_id): Path<GuildId>,
    Json(request): Json<AddPlayersRequest>,
) -> ApiResult<Json<BatchOutcome>> {
    if request.players.is_empty() {
        return Err(ApiError::BadRequest("No players to add".to_string()));
    }

    let lobby = lobby_for(&state, guild_id).await?;

    let mut participants = Vec::with_capacity(request.players.len());
    for player in request.players {
        participants.push(participant_for(&state, player.user_id, player.display_name).await?);
    }

    let outcome = lobby.add_many(participants).await?;
    metrics::roster_changes_total("add");
    Ok(Json(outcome))
}

/// Remove mentioned players; each rejection is reported separately.
pub async fn remove(
    State(state): State<AppState>,
    Path(guild_id): Path<GuildId>,
    Json(request): Json<RemovePlayersRequest>,
) -> ApiResult<Json<BatchOutcome>> {
    if request.user_ids.is_empty() {
        return Err(ApiError::BadRequest("No players to remove".to_string()));
    }

    let lobby = lobby_for(&state, guild_id).await?;

    let outcome = lobby.remove_many(request.user_ids).await?;
    metrics::roster_changes_total("remove");
    Ok(Json(outcome))
}

/// Clear the roster.
pub async fn reset(
    State(state): State<AppState>,
    Path(guild_id): Path<GuildId>,
) -> ApiResult<Json<LobbyView>> {
    let lobby = lobby_for(&state, guild_id).await?;

    let view = lobby.reset().await?;
    metrics::roster_changes_total("reset");
    Ok(Json(view))
}

/// Generate teams (regular) or captain pairs (immortal) for a full lobby.
///
/// # Errors
///
/// - `409 Conflict`: Lobby is not full
pub async fn generate(
    State(state): State<AppState>,
    Path(guild_id): Path<GuildId>,
) -> ApiResult<Json<AlternativeView>> {
    let lobby = lobby_for(&state, guild_id).await?;

    let view = lobby.generate().await?;
    record_alternative(&view, metrics::teams_generated_total);
    Ok(Json(view))
}

/// Show the next alternative. Admin only.
///
/// # Errors
///
/// - `403 Forbidden`: Actor is not an admin
/// - `409 Conflict`: Nothing generated for the current roster
pub async fn reroll(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(guild_id): Path<GuildId>,
) -> ApiResult<Json<AlternativeView>> {
    require_admin(&state, &actor, Some(guild_id), "reroll")?;
    let lobby = lobby_for(&state, guild_id).await?;

    let view = lobby.reroll().await?;
    record_alternative(&view, metrics::rerolls_total);
    Ok(Json(view))
}

/// Users to mention when a full lobby is called to play. Admin only.
pub async fn alert(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(guild_id): Path<GuildId>,
) -> ApiResult<Json<AlertResponse>> {
    require_admin(&state, &actor, Some(guild_id), "alert")?;
    let lobby = lobby_for(&state, guild_id).await?;

    let user_ids = lobby.alert_targets().await?;
    let password = lobby.view().await?.password;
    Ok(Json(AlertResponse { user_ids, password }))
}

/// Switch between regular and immortal draft mode. Admin only.
///
/// The mode is stored with the guild settings and applied to the running lobby.
pub async fn set_mode(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(guild_id): Path<GuildId>,
    Json(request): Json<SetModeRequest>,
) -> ApiResult<Json<LobbyView>> {
    require_admin(&state, &actor, Some(guild_id), "lobby mode")?;
    let mode: InhouseMode = request.mode.parse().map_err(ApiError::BadRequest)?;

    state
        .settings
        .set_mode(
            guild_id,
            mode,
            ChangeContext::new(actor.display_name.clone(), None),
        )
        .await?;

    let lobby = lobby_for(&state, guild_id).await?;
    Ok(Json(lobby.set_mode(mode).await?))
}

fn record_alternative(view: &AlternativeView, counter: fn(&str)) {
    match view {
        AlternativeView::Teams(teams) => {
            counter("regular");
            metrics::split_fairness(teams.fairness);
        }
        AlternativeView::Draft(_) => counter("immortal"),
    }
}

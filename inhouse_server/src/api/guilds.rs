//! Guild settings and command parsing handlers.
//!
//! Every settings change records who made it, which `viewlogs` shows.

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use inhouse::{
    auth::Actor,
    command::{Command, help_text},
    lobby::GuildId,
    settings::{ChangeContext, SettingEntry, render_audit_log},
};
use serde::{Deserialize, Serialize};

use super::{AppState, error::ApiResult, middleware::require_admin};

#[derive(Debug, Deserialize)]
pub struct SetPasswordRequest {
    pub password: String,
    #[serde(default)]
    pub server_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetPrefixRequest {
    pub prefix: String,
    #[serde(default)]
    pub server_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BindLeagueRequest {
    pub league_id: String,
    #[serde(default)]
    pub server_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetLiveChannelRequest {
    pub channel_id: i64,
    #[serde(default)]
    pub server_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ViewLogsQuery {
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub guild_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ViewLogsResponse {
    pub entries: Vec<SettingEntry>,
    /// Message text as the bot posts it
    pub rendered: String,
}

#[derive(Debug, Deserialize)]
pub struct ParseCommandRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ParseCommandResponse {
    /// `None` when the text is not addressed to the bot
    pub command: Option<Command>,
    pub requires_admin: bool,
    /// Help page text for `help` commands
    pub help: Option<String>,
}

fn context(actor: &Actor, server_name: Option<String>) -> ChangeContext {
    ChangeContext::new(actor.display_name.clone(), server_name)
}

/// Change the lobby password. Admin only.
///
/// A running lobby shows the new password from its next render on.
pub async fn set_password(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(guild_id): Path<GuildId>,
    Json(request): Json<SetPasswordRequest>,
) -> ApiResult<Json<SettingEntry>> {
    require_admin(&state, &actor, Some(guild_id), "setpassword")?;

    let entry = state
        .settings
        .set_password(
            guild_id,
            &request.password,
            context(&actor, request.server_name),
        )
        .await?;

    if let Some(lobby) = state.lobbies.get_lobby(guild_id).await {
        lobby.set_password(entry.value.clone()).await?;
    }

    Ok(Json(entry))
}

/// Change the command prefix. Admin only.
pub async fn set_prefix(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(guild_id): Path<GuildId>,
    Json(request): Json<SetPrefixRequest>,
) -> ApiResult<Json<SettingEntry>> {
    require_admin(&state, &actor, Some(guild_id), "changeprefix")?;

    let entry = state
        .settings
        .set_prefix(
            guild_id,
            &request.prefix,
            context(&actor, request.server_name),
        )
        .await?;
    Ok(Json(entry))
}

/// Stored settings with who changed them. Admin only.
pub async fn view_logs(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(guild_id): Path<GuildId>,
    Query(query): Query<ViewLogsQuery>,
) -> ApiResult<Json<ViewLogsResponse>> {
    require_admin(&state, &actor, Some(guild_id), "viewlogs")?;

    let entries = state.settings.audit_log(guild_id).await?;
    let guild_name = query
        .guild_name
        .unwrap_or_else(|| format!("Guild {}", guild_id));
    let rendered = render_audit_log(guild_id, &guild_name, &entries, query.verbose);

    Ok(Json(ViewLogsResponse { entries, rendered }))
}

/// Bind a league to the guild. Admin only.
pub async fn bind_league(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(guild_id): Path<GuildId>,
    Json(request): Json<BindLeagueRequest>,
) -> ApiResult<Json<SettingEntry>> {
    require_admin(&state, &actor, Some(guild_id), "bindleague")?;

    let entry = state
        .settings
        .bind_league(
            guild_id,
            &request.league_id,
            context(&actor, request.server_name),
        )
        .await?;
    Ok(Json(entry))
}

/// Set the channel for live match updates. Admin only.
pub async fn set_live_channel(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(guild_id): Path<GuildId>,
    Json(request): Json<SetLiveChannelRequest>,
) -> ApiResult<Json<SettingEntry>> {
    require_admin(&state, &actor, Some(guild_id), "setlivechannel")?;

    let entry = state
        .settings
        .set_live_channel(
            guild_id,
            request.channel_id,
            context(&actor, request.server_name),
        )
        .await?;
    Ok(Json(entry))
}

/// Parse a chat message with the guild's prefix.
///
/// Usage errors come back as `400 Bad Request` with the usage line, so the
/// bridge can post it verbatim.
pub async fn parse_command(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(guild_id): Path<GuildId>,
    Json(request): Json<ParseCommandRequest>,
) -> ApiResult<Json<ParseCommandResponse>> {
    let prefix = state.settings.prefix(guild_id).await?;
    let command = Command::parse(&prefix, &request.text)?;

    let help = match &command {
        Some(Command::Help { category }) => Some(help_text(&prefix, *category)),
        _ => None,
    };
    let requires_admin = command
        .as_ref()
        .is_some_and(|command| command.requires_admin(actor.user_id));

    Ok(Json(ParseCommandResponse {
        command,
        requires_admin,
        help,
    }))
}

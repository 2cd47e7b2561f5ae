//! Player rating handlers.
//!
//! Covers `!cfg`, `!mmr`, `!setmmr`, `!inhouse_mmr` and `!leaderboard`.

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use inhouse::{
    auth::Actor,
    lobby::{GuildId, Rating, UserId},
    rating::{InhouseRating, PlayerProfile},
};
use serde::{Deserialize, Serialize};

use super::{AppState, error::ApiResult, middleware::require_admin};

#[derive(Debug, Deserialize)]
pub struct LinkAccountRequest {
    /// 64-bit Steam ID or friend code
    pub steam_id: String,
    /// Name of the linked user; defaults to the actor's name when linking yourself
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetMmrRequest {
    pub mmr: i64,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MmrResponse {
    pub user_id: UserId,
    /// Rating used for balancing, 0 when unknown
    pub mmr: Rating,
    pub profile: Option<PlayerProfile>,
}

#[derive(Debug, Serialize)]
pub struct InhouseMmrResponse {
    pub guild_id: GuildId,
    pub user_id: UserId,
    pub rating: i64,
}

fn name_for(actor: &Actor, user_id: UserId, requested: Option<String>) -> String {
    requested.unwrap_or_else(|| {
        if user_id == actor.user_id {
            actor.display_name.clone()
        } else {
            format!("user{}", user_id)
        }
    })
}

/// Link a Steam account and fetch its rating.
///
/// Linking an account for someone else requires admin rights.
///
/// # Errors
///
/// - `400 Bad Request`: Steam ID is not numeric
/// - `403 Forbidden`: Linking another user without admin rights
pub async fn link_account(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(user_id): Path<UserId>,
    Json(request): Json<LinkAccountRequest>,
) -> ApiResult<Json<PlayerProfile>> {
    if user_id != actor.user_id {
        require_admin(&state, &actor, None, "cfg for another user")?;
    }

    let display_name = name_for(&actor, user_id, request.display_name);
    let profile = state
        .ratings
        .link_account(user_id, &display_name, &request.steam_id)
        .await?;
    Ok(Json(profile))
}

/// Stored rating of a user.
pub async fn get_mmr(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> ApiResult<Json<MmrResponse>> {
    let profile = state.ratings.profile(user_id).await?;
    let mmr = profile.as_ref().map(PlayerProfile::rating).unwrap_or(0);

    Ok(Json(MmrResponse {
        user_id,
        mmr,
        profile,
    }))
}

/// Set a user's rating manually. Admin only.
///
/// Only future lobby joins see the new rating.
pub async fn set_mmr(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(user_id): Path<UserId>,
    Json(request): Json<SetMmrRequest>,
) -> ApiResult<Json<PlayerProfile>> {
    require_admin(&state, &actor, None, "setmmr")?;

    let display_name = name_for(&actor, user_id, request.display_name);
    let profile = state
        .ratings
        .set_rating(user_id, &display_name, request.mmr)
        .await?;
    Ok(Json(profile))
}

/// Inhouse rating of a user in a guild.
pub async fn get_inhouse_mmr(
    State(state): State<AppState>,
    Path((guild_id, user_id)): Path<(GuildId, UserId)>,
) -> ApiResult<Json<InhouseMmrResponse>> {
    let rating = state.inhouse_ratings.rating_of(guild_id, user_id).await?;

    Ok(Json(InhouseMmrResponse {
        guild_id,
        user_id,
        rating,
    }))
}

/// Highest inhouse ratings of a guild.
pub async fn leaderboard(
    State(state): State<AppState>,
    Path(guild_id): Path<GuildId>,
) -> ApiResult<Json<Vec<InhouseRating>>> {
    Ok(Json(state.inhouse_ratings.leaderboard(guild_id).await?))
}

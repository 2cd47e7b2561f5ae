//! Wallet, betting and match submission handlers.
//!
//! Bets are open until an admin submits the match result; winners are paid
//! twice their stake and every open bet of the guild is then cleared.

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use inhouse::{
    auth::Actor,
    lobby::{GuildId, UserId},
    matches::MatchReport,
    wallet::{BetReceipt, Side},
};
use serde::{Deserialize, Serialize};

use super::{AppState, error::ApiResult, middleware::require_admin, request_id::RequestId};
use crate::metrics;

#[derive(Debug, Deserialize)]
pub struct PlaceBetRequest {
    pub amount: i64,
    /// `radiant` or `dire`, any case
    pub side: String,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub guild_id: GuildId,
    pub user_id: UserId,
    pub balance: i64,
}

#[derive(Debug, Deserialize)]
pub struct SubmitMatchRequest {
    pub match_id: String,
}

/// Place or raise a bet as the acting user.
///
/// # Errors
///
/// - `400 Bad Request`: Side is unknown or the amount is not positive
/// - `409 Conflict`: Bet is on the other side, does not increase, or exceeds the balance
pub async fn place_bet(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(guild_id): Path<GuildId>,
    Json(request): Json<PlaceBetRequest>,
) -> ApiResult<Json<BetReceipt>> {
    let side: Side = request.side.parse()?;

    let receipt = state
        .wallet
        .place_bet(
            guild_id,
            actor.user_id,
            side,
            request.amount,
            &actor.display_name,
        )
        .await?;

    metrics::bets_placed_total(side.as_str());
    metrics::bet_amount(request.amount);
    Ok(Json(receipt))
}

/// Wallet balance of a user.
pub async fn get_balance(
    State(state): State<AppState>,
    Path((guild_id, user_id)): Path<(GuildId, UserId)>,
) -> ApiResult<Json<BalanceResponse>> {
    let balance = state.wallet.balance(guild_id, user_id).await?;

    Ok(Json(BalanceResponse {
        guild_id,
        user_id,
        balance,
    }))
}

/// Submit a finished match. Admin only.
///
/// # Errors
///
/// - `400 Bad Request`: Match ID is not numeric
/// - `404 Not Found`: The provider has no result for the match
pub async fn submit_match(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    request_id: RequestId,
    Path(guild_id): Path<GuildId>,
    Json(request): Json<SubmitMatchRequest>,
) -> ApiResult<Json<MatchReport>> {
    require_admin(&state, &actor, Some(guild_id), "submitmatch")?;

    let report = state.matches.submit(guild_id, &request.match_id).await?;

    tracing::info!(
        request_id = request_id.as_str(),
        guild_id = guild_id,
        match_id = report.match_id,
        winners = report.winners.len(),
        payouts = report.payouts.len(),
        "Match submitted"
    );
    metrics::matches_submitted_total();
    Ok(Json(report))
}

//! HTTP API driven by the chat bridge.
//!
//! The bridge translates chat messages and reactions into calls on this API
//! and renders the JSON views it gets back.
//!
//! # Modules
//!
//! - [`lobbies`]: roster changes, team generation and rerolls
//! - [`players`]: account linking, ratings and the inhouse leaderboard
//! - [`bets`]: wallets, bets and match submission
//! - [`guilds`]: guild settings, admin logs and command parsing
//! - [`middleware`]: bridge token check and actor extraction
//!
//! # Endpoints Overview
//!
//! ```text
//! GET  /health
//! GET  /api/v1/guilds/{guild_id}/lobby
//! POST /api/v1/guilds/{guild_id}/lobby/{join|leave|add|remove|reset|generate|reroll|alert}
//! PUT  /api/v1/guilds/{guild_id}/lobby/mode
//! PUT  /api/v1/guilds/{guild_id}/settings/{password|prefix}
//! GET  /api/v1/guilds/{guild_id}/settings/logs
//! POST /api/v1/guilds/{guild_id}/settings/{league|live-channel}
//! POST /api/v1/guilds/{guild_id}/commands/parse
//! POST /api/v1/players/{user_id}/link
//! GET  /api/v1/players/{user_id}/mmr
//! PUT  /api/v1/players/{user_id}/mmr
//! GET  /api/v1/guilds/{guild_id}/players/{user_id}/inhouse-mmr
//! GET  /api/v1/guilds/{guild_id}/leaderboard
//! POST /api/v1/guilds/{guild_id}/bets
//! GET  /api/v1/guilds/{guild_id}/wallets/{user_id}
//! POST /api/v1/guilds/{guild_id}/matches
//! ```
//!
//! Everything under `/api/v1` requires `Authorization: Bearer <bridge token>`
//! and an `x-actor-id` header.

pub mod bets;
pub mod error;
pub mod guilds;
pub mod lobbies;
pub mod middleware;
pub mod players;
pub mod request_id;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
};
use inhouse::{
    auth::{AdminPolicy, BridgeToken},
    db::{
        Database, InhouseRatingRepository, ProfileRepository, SettingsRepository,
        WalletRepository,
    },
    lobby::LobbyManager,
    matches::{MatchReporter, MatchResultSource},
    rating::{InhouseRatingService, RatingService, RatingSource},
    settings::SettingsService,
    wallet::WalletManager,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::config::ServerConfig;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; every service is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub lobbies: Arc<LobbyManager>,
    pub ratings: RatingService,
    pub inhouse_ratings: InhouseRatingService,
    pub wallet: WalletManager,
    pub matches: MatchReporter,
    pub settings: SettingsService,
    pub policy: Arc<AdminPolicy>,
    pub bridge_token: Arc<BridgeToken>,
    /// Connection pool, absent when running on the in-process store
    pub database: Option<Database>,
}

impl AppState {
    /// Wire every service over one store
    ///
    /// # Arguments
    ///
    /// * `store` - Repository implementation shared by all services
    /// * `rating_source` - Provider of season ranks
    /// * `match_source` - Provider of finished match results
    /// * `config` - Server configuration
    pub fn new<S>(
        store: Arc<S>,
        rating_source: Arc<dyn RatingSource>,
        match_source: Arc<dyn MatchResultSource>,
        config: &ServerConfig,
    ) -> Self
    where
        S: ProfileRepository
            + InhouseRatingRepository
            + WalletRepository
            + SettingsRepository
            + 'static,
    {
        let ratings = RatingService::new(store.clone(), rating_source);
        let inhouse_ratings =
            InhouseRatingService::new(store.clone(), config.inhouse_rating.clone());
        let wallet = WalletManager::new(store.clone(), config.wallet_default_balance);
        let matches = MatchReporter::new(
            match_source,
            ratings.clone(),
            inhouse_ratings.clone(),
            wallet.clone(),
        );

        Self {
            lobbies: Arc::new(LobbyManager::new(config.lobby.clone())),
            ratings,
            inhouse_ratings,
            wallet,
            matches,
            settings: SettingsService::new(store),
            policy: Arc::new(AdminPolicy::new(
                config.security.global_admin_ids.iter().copied(),
                config.security.admin_roles.clone(),
            )),
            bridge_token: Arc::new(BridgeToken::new(config.security.bridge_token.clone())),
            database: None,
        }
    }

    /// Attach the connection pool checked by `/health`
    pub fn with_database(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }
}

/// Create the complete API router with all endpoints and middleware.
///
/// # Example
///
/// ```rust,no_run
/// # use inhouse_server::api::{create_router, AppState};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// # let state: AppState = unimplemented!();
/// let app = create_router(state);
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```
pub fn create_router(state: AppState) -> Router {
    let v1_routes = create_v1_router(state.clone());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", v1_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Create API v1 router; every route requires the bridge token.
fn create_v1_router(state: AppState) -> Router<AppState> {
    let lobby_routes = Router::new()
        .route("/guilds/{guild_id}/lobby", get(lobbies::get_lobby))
        .route("/guilds/{guild_id}/lobby/join", post(lobbies::join))
        .route("/guilds/{guild_id}/lobby/leave", post(lobbies::leave))
        .route("/guilds/{guild_id}/lobby/add", post(lobbies::add))
        .route("/guilds/{guild_id}/lobby/remove", post(lobbies::remove))
        .route("/guilds/{guild_id}/lobby/reset", post(lobbies::reset))
        .route("/guilds/{guild_id}/lobby/generate", post(lobbies::generate))
        .route("/guilds/{guild_id}/lobby/reroll", post(lobbies::reroll))
        .route("/guilds/{guild_id}/lobby/alert", post(lobbies::alert))
        .route("/guilds/{guild_id}/lobby/mode", put(lobbies::set_mode));

    let guild_routes = Router::new()
        .route(
            "/guilds/{guild_id}/settings/password",
            put(guilds::set_password),
        )
        .route("/guilds/{guild_id}/settings/prefix", put(guilds::set_prefix))
        .route("/guilds/{guild_id}/settings/logs", get(guilds::view_logs))
        .route("/guilds/{guild_id}/settings/league", post(guilds::bind_league))
        .route(
            "/guilds/{guild_id}/settings/live-channel",
            post(guilds::set_live_channel),
        )
        .route(
            "/guilds/{guild_id}/commands/parse",
            post(guilds::parse_command),
        );

    let player_routes = Router::new()
        .route("/players/{user_id}/link", post(players::link_account))
        .route(
            "/players/{user_id}/mmr",
            get(players::get_mmr).put(players::set_mmr),
        )
        .route(
            "/guilds/{guild_id}/players/{user_id}/inhouse-mmr",
            get(players::get_inhouse_mmr),
        )
        .route("/guilds/{guild_id}/leaderboard", get(players::leaderboard));

    let bet_routes = Router::new()
        .route("/guilds/{guild_id}/bets", post(bets::place_bet))
        .route(
            "/guilds/{guild_id}/wallets/{user_id}",
            get(bets::get_balance),
        )
        .route("/guilds/{guild_id}/matches", post(bets::submit_match));

    Router::new()
        .merge(lobby_routes)
        .merge(guild_routes)
        .merge(player_routes)
        .merge(bet_routes)
        .layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth_middleware,
        ))
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` when the database (if any) answers, `503 Service
/// Unavailable` otherwise.
///
/// ```bash
/// curl http://localhost:6969/health
/// # {"status":"healthy","database":true,"lobbies":{"active_count":2},...}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_healthy = match &state.database {
        Some(database) => database.health_check().await.is_ok(),
        None => true,
    };

    let active_lobbies = state.lobbies.active_lobby_count().await;
    crate::metrics::active_lobbies(active_lobbies);

    let status_code = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if db_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_healthy,
        "store": if state.database.is_some() { "postgres" } else { "memory" },
        "lobbies": {
            "active_count": active_lobbies
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}

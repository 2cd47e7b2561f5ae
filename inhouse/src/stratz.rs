//! STRATZ GraphQL client for season ranks and match results.

use crate::{
    matches::{FinishedMatch, MatchError, MatchId, MatchResult, MatchResultSource},
    rating::{RatingError, RatingResult, RatingSource, SteamId},
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// Default GraphQL endpoint
pub const STRATZ_API_URL: &str = "https://api.stratz.com/graphql";

const SEASON_RANK_QUERY: &str = "query ($steamAccountId: Long!) { player(steamAccountId: $steamAccountId) { steamAccount { seasonRank } } }";

const MATCH_QUERY: &str = "query ($matchId: Long!) { match(id: $matchId) { id didRadiantWin players { steamAccountId isRadiant } } }";

/// STRATZ client errors
#[derive(Debug, Error)]
pub enum StratzError {
    /// Transport or decoding failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Still rate limited after every retry
    #[error("Rate limited after {0} attempts")]
    RateLimited(u32),

    /// GraphQL reported errors
    #[error("GraphQL error: {0}")]
    GraphQl(String),
}

/// Result type for STRATZ requests
pub type StratzResult<T> = Result<T, StratzError>;

impl From<StratzError> for RatingError {
    fn from(err: StratzError) -> Self {
        RatingError::Provider(err.to_string())
    }
}

impl From<StratzError> for MatchError {
    fn from(err: StratzError) -> Self {
        MatchError::Provider(err.to_string())
    }
}

/// STRATZ client configuration
#[derive(Debug, Clone)]
pub struct StratzConfig {
    pub api_url: String,
    pub token: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Attempts made while rate limited
    pub max_retries: u32,
    /// Delay before the first retry; doubled on each further attempt
    pub backoff_base: Duration,
    pub user_agent: String,
}

impl StratzConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_url: STRATZ_API_URL.to_string(),
            token: token.into(),
            timeout: Duration::from_secs(5),
            max_retries: 5,
            backoff_base: Duration::from_secs(1),
            user_agent: "STRATZ_API".to_string(),
        }
    }

    /// Delay after the given zero-based attempt was rate limited
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        self.backoff_base
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// STRATZ API client
#[derive(Clone)]
pub struct StratzClient {
    client: reqwest::Client,
    config: StratzConfig,
}

impl StratzClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// * `StratzError::Http` - The HTTP client could not be built, e.g. the
    ///   user agent is not a valid header value
    pub fn new(config: StratzConfig) -> StratzResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client, config })
    }

    /// Run a GraphQL query, retrying with exponential back-off while rate limited
    ///
    /// # Returns
    ///
    /// * `StratzResult<Option<T>>` - `None` for any non-success status other than 429
    async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> StratzResult<Option<T>> {
        let body = json!({ "query": query, "variables": variables });

        for attempt in 0..self.config.max_retries {
            let response = self
                .client
                .post(&self.config.api_url)
                .bearer_auth(&self.config.token)
                .json(&body)
                .send()
                .await?;

            match response.status() {
                StatusCode::OK => {
                    let envelope: GraphQlResponse<T> = response.json().await?;
                    return envelope.into_data();
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    let delay = self.config.retry_delay(attempt);
                    log::warn!(
                        "STRATZ rate limited (attempt {}), retrying in {:?}",
                        attempt + 1,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                status => {
                    log::warn!("STRATZ returned {}", status);
                    return Ok(None);
                }
            }
        }

        Err(StratzError::RateLimited(self.config.max_retries))
    }
}

#[async_trait]
impl RatingSource for StratzClient {
    async fn fetch_season_rank(&self, steam_id: SteamId) -> RatingResult<Option<u32>> {
        let data: Option<PlayerData> = self
            .query(SEASON_RANK_QUERY, json!({ "steamAccountId": steam_id }))
            .await?;

        Ok(data.and_then(PlayerData::season_rank))
    }
}

#[async_trait]
impl MatchResultSource for StratzClient {
    async fn fetch_match(&self, match_id: MatchId) -> MatchResult<Option<FinishedMatch>> {
        let data: Option<MatchData> = self
            .query(MATCH_QUERY, json!({ "matchId": match_id }))
            .await?;

        Ok(data.and_then(MatchData::into_finished_match))
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

impl<T> GraphQlResponse<T> {
    fn into_data(self) -> StratzResult<Option<T>> {
        match (self.data, self.errors.is_empty()) {
            (Some(data), _) => Ok(Some(data)),
            (None, true) => Ok(None),
            (None, false) => Err(StratzError::GraphQl(
                self.errors
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join("; "),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PlayerData {
    player: Option<Player>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Player {
    steam_account: Option<SteamAccount>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SteamAccount {
    season_rank: Option<u32>,
}

impl PlayerData {
    fn season_rank(self) -> Option<u32> {
        self.player?.steam_account?.season_rank
    }
}

#[derive(Debug, Deserialize)]
struct MatchData {
    #[serde(rename = "match")]
    game: Option<MatchNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchNode {
    id: MatchId,
    did_radiant_win: Option<bool>,
    #[serde(default)]
    players: Vec<MatchPlayer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchPlayer {
    steam_account_id: Option<SteamId>,
    is_radiant: bool,
}

impl MatchData {
    /// Matches without a recorded winner are treated as missing
    fn into_finished_match(self) -> Option<FinishedMatch> {
        let game = self.game?;
        let radiant_win = game.did_radiant_win?;

        let (radiant, dire): (Vec<MatchPlayer>, Vec<MatchPlayer>) =
            game.players.into_iter().partition(|p| p.is_radiant);

        Some(FinishedMatch {
            match_id: game.id,
            radiant_win,
            radiant: radiant.into_iter().filter_map(|p| p.steam_account_id).collect(),
            dire: dire.into_iter().filter_map(|p| p.steam_account_id).collect(),
        })
    }
}

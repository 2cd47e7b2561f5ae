//! Match result provider abstraction.

use super::{
    errors::MatchResult,
    models::{FinishedMatch, MatchId},
};
use async_trait::async_trait;
use std::{collections::HashMap, sync::Mutex};

/// External source of finished match results
#[async_trait]
pub trait MatchResultSource: Send + Sync {
    /// Fetch a finished match
    ///
    /// # Returns
    ///
    /// * `MatchResult<Option<FinishedMatch>>` - `None` when the match is unknown
    async fn fetch_match(&self, match_id: MatchId) -> MatchResult<Option<FinishedMatch>>;
}

/// Match source answering from stored results
#[derive(Debug, Default)]
pub struct FixedMatchSource {
    matches: Mutex<HashMap<MatchId, FinishedMatch>>,
}

impl FixedMatchSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_match(self, finished: FinishedMatch) -> Self {
        if let Ok(mut matches) = self.matches.lock() {
            matches.insert(finished.match_id, finished);
        }
        self
    }
}

#[async_trait]
impl MatchResultSource for FixedMatchSource {
    async fn fetch_match(&self, match_id: MatchId) -> MatchResult<Option<FinishedMatch>> {
        Ok(self
            .matches
            .lock()
            .ok()
            .and_then(|matches| matches.get(&match_id).cloned()))
    }
}

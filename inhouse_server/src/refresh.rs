//! Background refresh of linked players' ratings.

use inhouse::rating::RatingService;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

use crate::{logging, metrics};

/// Spawn the periodic rating refresh
///
/// The first run starts immediately, then one run per `interval`. A failed
/// run is logged and retried at the next tick.
///
/// # Arguments
///
/// * `ratings` - Rating service to refresh through
/// * `interval` - Time between runs
///
/// # Returns
///
/// * `JoinHandle<()>` - Handle of the background task; abort it on shutdown
pub fn spawn_refresh_task(ratings: RatingService, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            refresh_once(&ratings).await;
        }
    })
}

/// Run a single refresh and record its outcome
pub async fn refresh_once(ratings: &RatingService) {
    let started = Instant::now();

    match ratings.refresh_all().await {
        Ok(summary) => {
            tracing::info!(
                checked = summary.checked,
                updated = summary.updated,
                failed = summary.failed,
                "Rating refresh finished"
            );
            metrics::rating_refresh(summary.updated, summary.failed);
            logging::log_performance(
                "rating_refresh",
                started.elapsed().as_millis() as u64,
                Some(&format!("{} profiles", summary.checked)),
            );
        }
        Err(e) => tracing::error!(error = %e, "Rating refresh failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inhouse::{db::MemoryStore, rating::FixedRatingSource};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_refresh_once_updates_linked_profiles() {
        let store = Arc::new(MemoryStore::new());
        let source = Arc::new(FixedRatingSource::new());
        let ratings = RatingService::new(store, source.clone());

        ratings
            .link_account(1, "player1", "1001")
            .await
            .expect("link");
        assert_eq!(ratings.rating_of(1).await.expect("rating"), 0);

        source.set_rank(1001, 80);
        refresh_once(&ratings).await;

        assert_eq!(ratings.rating_of(1).await.expect("rating"), 5650);
    }

    #[tokio::test]
    async fn test_refresh_task_runs_immediately() {
        let store = Arc::new(MemoryStore::new());
        let source = Arc::new(FixedRatingSource::new().with_rank(1001, 80));
        let ratings = RatingService::new(store, source.clone());
        ratings
            .link_account(1, "player1", "1001")
            .await
            .expect("link");
        source.set_rank(1001, 11);

        let handle = spawn_refresh_task(ratings.clone(), Duration::from_secs(3600));
        for _ in 0..100 {
            if ratings.rating_of(1).await.expect("rating") != 5650 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        handle.abort();

        assert_ne!(ratings.rating_of(1).await.expect("rating"), 5650);
    }
}

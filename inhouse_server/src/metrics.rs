//! Prometheus metrics for monitoring lobby, betting and API activity.
//!
//! Metrics are exposed in Prometheus text format when `METRICS_BIND` is set.
//! Recording is a no-op until the exporter is installed.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use inhouse_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::http_requests_total("POST", "/api/v1/guilds/1/lobby/join", 200);
//! metrics::teams_generated_total("regular");
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
///
/// # Returns
///
/// Result indicating success or error message
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request.
pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record HTTP request duration in milliseconds.
pub fn http_request_duration_ms(method: &str, path: &str, duration_ms: f64) {
    metrics::histogram!("http_request_duration_ms",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_ms);
}

// ============================================================================
// Lobby Metrics
// ============================================================================

/// Set current active lobbies count.
pub fn active_lobbies(count: usize) {
    metrics::gauge!("active_lobbies").set(count as f64);
}

/// Increment roster change counter.
pub fn roster_changes_total(change: &str) {
    metrics::counter!("roster_changes_total", "change" => change.to_string()).increment(1);
}

/// Increment generated teams counter.
pub fn teams_generated_total(mode: &str) {
    metrics::counter!("teams_generated_total", "mode" => mode.to_string()).increment(1);
}

/// Increment reroll counter.
pub fn rerolls_total(mode: &str) {
    metrics::counter!("rerolls_total", "mode" => mode.to_string()).increment(1);
}

/// Record the fairness of the teams on display.
pub fn split_fairness(fairness: f64) {
    metrics::histogram!("split_fairness").record(fairness);
}

// ============================================================================
// Betting Metrics
// ============================================================================

/// Increment placed bets counter.
pub fn bets_placed_total(side: &str) {
    metrics::counter!("bets_placed_total", "side" => side.to_string()).increment(1);
}

/// Record stake distribution.
pub fn bet_amount(amount: i64) {
    metrics::histogram!("bet_amount").record(amount as f64);
}

/// Increment submitted matches counter.
pub fn matches_submitted_total() {
    metrics::counter!("matches_submitted_total").increment(1);
}

// ============================================================================
// Rating Metrics
// ============================================================================

/// Record the outcome of a rating refresh run.
pub fn rating_refresh(updated: usize, failed: usize) {
    metrics::counter!("rating_refresh_runs_total").increment(1);
    metrics::counter!("rating_refresh_updated_total").increment(updated as u64);
    metrics::counter!("rating_refresh_failed_total").increment(failed as u64);
}

// ============================================================================
// Auth Metrics
// ============================================================================

/// Increment denied request counter.
pub fn auth_denials_total(reason: &str) {
    metrics::counter!("auth_denials_total", "reason" => reason.to_string()).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_exporter_is_noop() {
        http_requests_total("GET", "/health", 200);
        http_request_duration_ms("GET", "/health", 1.5);
        active_lobbies(3);
        roster_changes_total("join");
        teams_generated_total("regular");
        rerolls_total("immortal");
        split_fairness(12.4);
        bets_placed_total("radiant");
        bet_amount(250);
        matches_submitted_total();
        rating_refresh(4, 1);
        auth_denials_total("forbidden");
    }
}

//! Structured logging configuration.
//!
//! The core library logs through the `log` facade; the subscriber installed
//! here forwards those records so library and server events share one output.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info,sqlx=warn,hyper=warn";

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var.
///
/// # Example
///
/// ```no_run
/// use inhouse_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log security event with structured data
///
/// # Arguments
///
/// * `event_type` - Type of security event
/// * `user_id` - Acting user, when known
/// * `guild_id` - Guild the request targeted, when known
/// * `message` - Event message
///
/// # Example
///
/// ```
/// use inhouse_server::logging::log_security_event;
///
/// log_security_event("invalid_bridge_token", None, None, "Bearer token mismatch");
/// ```
pub fn log_security_event(
    event_type: &str,
    user_id: Option<i64>,
    guild_id: Option<i64>,
    message: &str,
) {
    tracing::warn!(event_type, user_id, guild_id, "SECURITY: {}", message);
}

/// Operations slower than this are logged as warnings
pub const SLOW_OPERATION_MS: u64 = 1000;

/// Log a timed operation, warning when it exceeds [`SLOW_OPERATION_MS`]
pub fn log_performance(operation: &str, duration_ms: u64, metadata: Option<&str>) {
    if duration_ms > SLOW_OPERATION_MS {
        tracing::warn!(operation, duration_ms, metadata, "Slow operation");
    } else {
        tracing::debug!(operation, duration_ms, metadata, "Operation timed");
    }
}

/// Log a completed API request at a level matching its status
///
/// # Arguments
///
/// * `method` - HTTP method
/// * `path` - Request path
/// * `status_code` - Response status code
/// * `duration_ms` - Request duration in milliseconds
/// * `request_id` - Correlation ID
pub fn log_api_request(
    method: &str,
    path: &str,
    status_code: u16,
    duration_ms: u64,
    request_id: &str,
) {
    // Server faults are errors, rejected bridge calls are worth a warning
    match status_code {
        500.. => tracing::error!(
            http_method = method,
            http_path = path,
            http_status = status_code,
            duration_ms,
            request_id,
            "API request failed"
        ),
        401 | 403 => tracing::warn!(
            http_method = method,
            http_path = path,
            http_status = status_code,
            duration_ms,
            request_id,
            "API request rejected"
        ),
        _ => tracing::info!(
            http_method = method,
            http_path = path,
            http_status = status_code,
            duration_ms,
            request_id,
            "API request completed"
        ),
    }
}

//! Inhouse lobby server.
//!
//! Serves the lobby, rating, betting and settings API for a chat bridge,
//! backed by PostgreSQL or, with `--memory`, by an in-process store.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Error};
use ctrlc::set_handler;
use inhouse::{
    db::{Database, MemoryStore},
    matches::{FixedMatchSource, MatchResultSource},
    rating::{FixedRatingSource, RatingSource},
    stratz::{StratzClient, StratzConfig},
};
use inhouse_server::{
    api,
    config::ServerConfig,
    logging, metrics, refresh,
};
use pico_args::Arguments;
use tokio::sync::watch;
use tracing::{info, warn};

const HELP: &str = "\
Run the inhouse lobby server

USAGE:
  inhouse_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:6969]
  --db-url     URL         Database connection string  [default: env DATABASE_URL]

FLAGS:
  --memory                 Keep all data in memory instead of PostgreSQL
  -h, --help               Print help information

ENVIRONMENT:
  BRIDGE_TOKEN             Bearer token the chat bridge presents (required, 32+ chars)
  STRATZ_TOKEN             STRATZ API token for ratings and match results
  DATABASE_URL             PostgreSQL connection string
  METRICS_BIND             Prometheus exporter address (e.g., 127.0.0.1:9090)
  (See .env.example for all configuration options)
";

struct Args {
    bind: Option<SocketAddr>,
    database_url: Option<String>,
    in_memory: bool,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        bind: pargs
            .opt_value_from_str("--bind")
            .context("Invalid --bind address")?,
        database_url: pargs.opt_value_from_str("--db-url")?,
        in_memory: pargs.contains("--memory"),
    };

    // SIGINT and SIGTERM start a graceful shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    set_handler(move || {
        let _ = shutdown_tx.send(true);
    })?;

    logging::init();

    let config = ServerConfig::from_env(args.bind, args.database_url, args.in_memory)?;
    config.validate()?;
    info!("Starting inhouse server at {}", config.bind);

    if let Some(addr) = config.metrics_bind {
        metrics::init_metrics(addr).map_err(anyhow::Error::msg)?;
        info!("Prometheus metrics exported at http://{}/metrics", addr);
    }

    let (rating_source, match_source): (Arc<dyn RatingSource>, Arc<dyn MatchResultSource>) =
        match &config.stratz_token {
            Some(token) => {
                let client = StratzClient::new(StratzConfig::new(token.clone()))
                    .context("Failed to build STRATZ client")?;
                (Arc::new(client.clone()), Arc::new(client))
            }
            None => {
                warn!("STRATZ_TOKEN not set; ratings and match results are unavailable");
                (
                    Arc::new(FixedRatingSource::new()),
                    Arc::new(FixedMatchSource::new()),
                )
            }
        };

    let state = if config.in_memory {
        warn!("Running on the in-memory store; data is lost on exit");
        api::AppState::new(
            Arc::new(MemoryStore::new()),
            rating_source,
            match_source,
            &config,
        )
    } else {
        info!("Connecting to database");
        let db = Database::new(&config.database)
            .await
            .context("Failed to connect to database")?;
        db.run_migrations()
            .await
            .context("Failed to run database migrations")?;
        info!("Database connected successfully");

        api::AppState::new(
            Arc::new(db.store()),
            rating_source,
            match_source,
            &config,
        )
        .with_database(db)
    };

    // Bets never survive a restart
    let cleared = state.wallet.clear_all_bets().await?;
    if cleared > 0 {
        info!("Cleared {} bet(s) left open by the previous run", cleared);
    }

    let refresh_task =
        refresh::spawn_refresh_task(state.ratings.clone(), config.rating_refresh_interval());

    let lobbies = state.lobbies.clone();
    let app = api::create_router(state);

    info!("Starting HTTP server on {}", config.bind);
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_rx))
        .await
        .context("Server error")?;

    info!("Shutting down server...");
    refresh_task.abort();
    lobbies.close_all().await;

    Ok(())
}

/// Resolves once a termination signal arrives
async fn shutdown_signal(mut shutdown: watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_ok() {
        info!("Termination signal received");
    }
}

//! api-warden - Credential-based authentication and rate limiting for a small record API
//!
//! This is the main entry point for the api-warden application.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tracing::info;

use api_warden::auth::{CredentialConfig, CredentialService, RateLimitConfig, RateLimiter};
use api_warden::config::Config;
use api_warden::database::SqliteDatabase;
use api_warden::logging::init_logging;
use api_warden::server::{AppState, Server};

/// How often lapsed rate-limit counters are swept out of memory
const LIMITER_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// api-warden - Credential-based authentication and rate limiting for a small record API
#[derive(Parser, Debug)]
#[command(name = "api-warden")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "API_WARDEN_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load and validate configuration
    let config = load_config(&args)?;
    config.validate()?;

    // Initialize tracing/logging
    init_logging(&config.logging)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting api-warden");

    // Initialize database
    let database = SqliteDatabase::new(&config.database.path).await?;
    let database = Arc::new(database);
    info!(path = %config.database.path, "Database initialized");

    // Initialize credential service
    let jwt_secret = config
        .auth
        .jwt_secret
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("auth.jwt_secret is required"))?
        .as_bytes()
        .to_vec();
    let credentials = Arc::new(CredentialService::new(
        Arc::clone(&database),
        CredentialConfig {
            jwt_secret,
            token_ttl: Duration::from_secs(config.auth.token_ttl_secs),
        },
    ));
    info!(
        token_ttl_secs = config.auth.token_ttl_secs,
        "Credential service initialized"
    );

    // Initialize rate limiter
    let rate_limiter = Arc::new(RateLimiter::new(RateLimitConfig {
        max_requests: config.rate_limit.max_requests,
        window: Duration::from_secs(config.rate_limit.window_secs),
    }));
    info!(
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window_secs,
        "Rate limiter initialized"
    );

    // Periodically free counters whose window has lapsed
    let sweeper = Arc::clone(&rate_limiter);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(LIMITER_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let evicted = sweeper.evict_idle();
            if evicted > 0 {
                tracing::debug!(
                    evicted,
                    remaining = sweeper.tracked_keys(),
                    "Swept idle rate limit counters"
                );
            }
        }
    });

    // Create application state
    let state = AppState {
        credentials,
        database,
        rate_limiter,
    };

    // Create and start the HTTP server
    let server = Server::new(config.server.clone(), state);
    let shutdown_signal = shutdown_signal();

    info!(
        host = %config.server.host,
        port = %config.server.port,
        "Starting HTTP server"
    );

    server.run(shutdown_signal).await?;

    info!("api-warden shutdown complete");

    Ok(())
}

/// Load configuration from file or environment
fn load_config(args: &Args) -> anyhow::Result<Config> {
    match &args.config {
        Some(path) => {
            // Use eprintln! since tracing is not yet initialized
            eprintln!("Loading configuration from file: {}", path);
            Config::from_file(path).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
        }
        None => {
            // Use eprintln! since tracing is not yet initialized
            eprintln!("Loading configuration from environment variables");
            Config::from_env().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
        }
    }
}

/// Create a future that resolves when a shutdown signal is received
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

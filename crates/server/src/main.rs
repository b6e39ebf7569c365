use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use playaxis_core::{
    datasets, load_config, validate_config, LocalCatalog, LogFormat, RawgClient, RemoteAdapter,
};
use playaxis_server::{api::create_router, state::AppState};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        eprintln!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(format: LogFormat) {
    let (pretty, json) = match format {
        LogFormat::Pretty => (Some(tracing_subscriber::fmt::layer()), None),
        LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(pretty)
        .with(json)
        .init();
}

async fn run() -> Result<()> {
    // Determine config path
    let config_path = std::env::var("PLAYAXIS_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration; logging needs its format, so it starts right after
    let loaded = load_config(&config_path);
    init_tracing(
        loaded
            .as_ref()
            .map(|config| config.logging.format)
            .unwrap_or_default(),
    );
    info!("PlayAxis {} loading configuration from {:?}", VERSION, config_path);
    let config =
        loaded.with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    let sanitized = serde_json::to_string(&playaxis_core::SanitizedConfig::from(&config))
        .unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(sanitized.as_bytes()));
    info!("Configuration loaded successfully (hash {})", &config_hash[..16]);

    // Create games adapter if configured
    let games: Option<Arc<dyn RemoteAdapter>> = match &config.rawg {
        Some(rawg_config) => {
            info!("Initializing RAWG client at {}", rawg_config.base_url);
            Some(Arc::new(
                RawgClient::new(rawg_config.clone()).context("Failed to create RAWG client")?,
            ))
        }
        None => {
            warn!("RAWG not configured; games endpoints serve fallback data or 503");
            None
        }
    };

    // Bundled datasets
    let cars = datasets::car_catalog().context("Failed to load car dataset")?;
    info!("Car catalog loaded ({} cars)", cars.len());
    let fallback_games = LocalCatalog::from_records(
        "fallback_games",
        &datasets::fallback_games().context("Failed to load fallback games")?,
    );

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), cars, fallback_games, games));

    // Create router
    let app = create_router(Arc::clone(&state));

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    let shutdown_state = Arc::clone(&state);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            info!("Server shutting down, cancelling in-flight upstream calls");
            shutdown_state.cancel_in_flight();
        })
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

//! minutes-api - Meeting transcript action-item service
//!
//! Startup sequence:
//! 1. Parse CLI/ENV, load TOML, resolve configuration
//! 2. Initialize tracing and log build identification
//! 3. Open the database and build the language model client
//! 4. Serve HTTP until Ctrl+C / SIGTERM

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use minutes_api::cli::Args;
use minutes_api::llm::GeminiClient;
use minutes_api::{build_router, AppState, ModelSelection};
use minutes_common::config::{load_toml_config, ServiceConfig};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let toml_config = load_toml_config(args.config.as_deref())?;
    let config_found = toml_config.is_some();
    let config = ServiceConfig::resolve(args.overrides(), toml_config.unwrap_or_default());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build identification first, before any slow startup step
    info!(
        "Starting {} built {} ({})",
        minutes_api::build_identity(),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    if !config_found {
        info!("No config file found, using environment and defaults");
    }

    let pool = minutes_common::db::init_database(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    info!("✓ Database ready");

    let client = GeminiClient::new(&config.llm).context("Failed to build language model client")?;
    if client.is_configured() {
        info!(
            extraction_model = %config.llm.extraction_model,
            health_model = %config.llm.health_model,
            "✓ Language model client ready"
        );
    } else {
        warn!("GEMINI_API_KEY not set; extraction will fail and health will report llm down");
    }

    let state = AppState::new(pool, Arc::new(client), ModelSelection::from(&config.llm));
    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("minutes-api listening on http://{}", addr);
    info!("Health check: http://{}/api/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}

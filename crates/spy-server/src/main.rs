//! SPY Progress Dashboard HTTP Server
//!
//! Serves per-learner progress, attempts and statements as JSON.

use anyhow::Result;
use spy_server::{api, config::ServerConfig, engine};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first so that its log level applies
    let config = ServerConfig::load()?;

    // Initialize tracing
    init_tracing(&config)?;
    info!(
        "Loaded configuration: {}:{}, LRS {}",
        config.host, config.port, config.lrs.endpoint
    );

    // Initialize dashboard engine
    let engine = engine::init_engine(&config).await?;
    info!("Dashboard engine initialized");

    let app = api::create_router(Arc::new(engine));

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    info!("✓ Server listening on http://{}", addr);
    info!("  Health check: http://{}/health", addr);
    info!("  Login: POST http://{}/v1/login", addr);
    info!("  Progress: http://{}/v1/learners/{{identifier}}/progress", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Initialize tracing subscriber
fn init_tracing(config: &ServerConfig) -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(())
}

//! Dashboard engine initialization

use crate::config::ServerConfig;
use anyhow::Result;
use spy_sdk::{DashboardEngine, DashboardEngineBuilder};
use tracing::{info, warn};

/// Initialize the dashboard engine: LRS client plus level catalog
pub async fn init_engine(config: &ServerConfig) -> Result<DashboardEngine> {
    if config.lrs.username.is_empty() {
        warn!("No LRS credentials configured, requests are sent without authentication");
    }

    let engine = DashboardEngineBuilder::new()
        .with_config(config.engine_config())
        .build()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to build dashboard engine: {}", e))?;

    let maxima = engine.maxima().len();
    info!(
        "Catalog category '{}' holds {} missions",
        config.catalog.category, maxima
    );

    Ok(engine)
}

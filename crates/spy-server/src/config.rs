//! Server configuration

use serde::{Deserialize, Serialize};
use spy_sdk::{CatalogConfig, EngineConfig, LrsConfig, PipelineOptions};

/// Prefix of environment variables, e.g. `SPY_PORT` or `SPY_LRS__USERNAME`
pub const ENV_PREFIX: &str = "SPY";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port (HTTP)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Level of the dashboard crates when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Event store settings, including the LRS credentials
    #[serde(default)]
    pub lrs: LrsConfig,

    /// Level catalog settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Pipeline policies
    #[serde(default)]
    pub pipeline: PipelineOptions,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8050
}

fn default_log_level() -> String {
    "debug".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            lrs: LrsConfig::default(),
            catalog: CatalogConfig::default(),
            pipeline: PipelineOptions::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables and config file
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file if exists
        dotenvy::dotenv().ok();

        Self::from_sources(
            config::File::with_name("config/server").required(false),
            Self::environment(),
        )
    }

    /// Environment source: `SPY_` prefix, `__` between nested keys
    pub fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
    }

    /// Build the configuration from a file source overlaid with an environment source
    pub fn from_sources<F>(file: F, environment: config::Environment) -> anyhow::Result<Self>
    where
        F: config::Source + Send + Sync + 'static,
    {
        let config_result = config::Config::builder()
            .add_source(file)
            .add_source(environment)
            .build();

        match config_result {
            Ok(cfg) => cfg
                .try_deserialize()
                .map_err(|e| anyhow::anyhow!("Failed to deserialize config: {}", e)),
            Err(e) => {
                tracing::info!("No usable configuration source ({}), using default configuration", e);
                Ok(Self::default())
            }
        }
    }

    /// Default tracing filter derived from `log_level`
    pub fn log_filter(&self) -> String {
        let level = &self.log_level;
        format!(
            "spy_server={level},spy_sdk={level},spy_repository=info,spy_core=info,tower_http={level}"
        )
    }

    /// Configuration handed to the dashboard engine
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            lrs: self.lrs.clone(),
            catalog: self.catalog.clone(),
            pipeline: self.pipeline.clone(),
        }
    }
}

//! Engine configuration

use serde::{Deserialize, Serialize};
use spy_core::PipelineOptions;
use spy_repository::{CatalogConfig, LrsConfig};

/// Configuration of a [`DashboardEngine`](crate::DashboardEngine)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Event store settings
    #[serde(default)]
    pub lrs: LrsConfig,

    /// Level catalog settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Pipeline policies
    #[serde(default)]
    pub pipeline: PipelineOptions,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

//! Builder pattern for DashboardEngine

use crate::config::EngineConfig;
use crate::engine::DashboardEngine;
use crate::error::Result;
use spy_core::PipelineOptions;
use spy_repository::{
    CatalogConfig, CatalogLoader, LrsClient, LrsConfig, MaxScoreCatalog, StatementSource,
};
use std::sync::Arc;

/// Builder for DashboardEngine
///
/// # Example
///
/// ```rust,ignore
/// use spy_sdk::{CatalogConfig, DashboardEngineBuilder, LrsConfig};
///
/// // Production: LRS client and catalog read from the level directory
/// let engine = DashboardEngineBuilder::new()
///     .with_lrs(LrsConfig::default().with_credentials(key, secret))
///     .with_catalog_config(CatalogConfig::new("Levels"))
///     .build()
///     .await?;
///
/// // Tests: fixed statements and catalog
/// let engine = DashboardEngineBuilder::new()
///     .with_source(Arc::new(MemoryStatementSource::new()))
///     .with_catalog(MaxScoreCatalog::new())
///     .build()
///     .await?;
/// ```
pub struct DashboardEngineBuilder {
    config: EngineConfig,
    source: Option<Arc<dyn StatementSource>>,
    catalog: Option<MaxScoreCatalog>,
}

impl DashboardEngineBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: EngineConfig::new(),
            source: None,
            catalog: None,
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set event store configuration
    pub fn with_lrs(mut self, lrs: LrsConfig) -> Self {
        self.config.lrs = lrs;
        self
    }

    /// Use a custom statement source instead of the LRS client
    ///
    /// The fetch limits of the LRS configuration still apply.
    pub fn with_source(mut self, source: Arc<dyn StatementSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Set level catalog configuration
    pub fn with_catalog_config(mut self, catalog: CatalogConfig) -> Self {
        self.config.catalog = catalog;
        self
    }

    /// Use a prebuilt catalog instead of reading the level directory
    pub fn with_catalog(mut self, catalog: MaxScoreCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Set pipeline policies
    pub fn with_pipeline_options(mut self, options: PipelineOptions) -> Self {
        self.config.pipeline = options;
        self
    }

    /// Build the dashboard engine
    ///
    /// The level catalog is loaded once here. A missing level directory is
    /// not fatal: the configured overrides are used alone.
    pub async fn build(self) -> Result<DashboardEngine> {
        let source: Arc<dyn StatementSource> = match self.source {
            Some(source) => source,
            None => Arc::new(LrsClient::new(self.config.lrs.clone())?),
        };

        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => {
                CatalogLoader::new(self.config.catalog.clone())
                    .load_or_default()
                    .await
            }
        };

        Ok(DashboardEngine::new(source, catalog, self.config))
    }
}

impl Default for DashboardEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spy_core::TimeSpentMode;
    use spy_repository::MemoryStatementSource;

    #[tokio::test]
    async fn test_builder_defaults() {
        let engine = DashboardEngineBuilder::new()
            .with_catalog_config(CatalogConfig::new("/nonexistent/Levels"))
            .build()
            .await
            .unwrap();

        // Missing level directory leaves the overrides only
        assert_eq!(engine.maxima().get("mission08"), Some(&3976));
        assert_eq!(engine.config().lrs.progress_limit, 500);
    }

    #[tokio::test]
    async fn test_builder_with_multiple_options() {
        let builder = DashboardEngineBuilder::new()
            .with_source(Arc::new(MemoryStatementSource::new()))
            .with_catalog(MaxScoreCatalog::new().with_override("Infiltration", "mission01", 200))
            .with_pipeline_options(PipelineOptions::default().with_time_spent(TimeSpentMode::Span));

        assert!(builder.source.is_some());
        assert_eq!(builder.config.pipeline.time_spent, TimeSpentMode::Span);

        let engine = builder.build().await.unwrap();
        assert_eq!(engine.maxima().get("mission01"), Some(&200));
    }
}

//! DashboardEngine - runs the metrics pipeline for one learner

use crate::config::EngineConfig;
use crate::error::{Result, SdkError};
use crate::view::{AttemptsView, ProgressView, StatementsView};
use spy_core::{
    NormalizedBatch, ProgressAggregator, ScoreNormalizer, StatementNormalizer, TimeSpent,
};
use spy_repository::{MaxScoreCatalog, StatementSource};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

/// Main dashboard engine
///
/// Holds the statement source and the level catalog; every request fetches
/// fresh statements and recomputes the views. Nothing is cached between calls.
pub struct DashboardEngine {
    /// Event store
    source: Arc<dyn StatementSource>,

    /// Maxima, read-only after startup
    catalog: Arc<MaxScoreCatalog>,

    /// Configuration
    config: EngineConfig,
}

impl DashboardEngine {
    pub fn new(source: Arc<dyn StatementSource>, catalog: MaxScoreCatalog, config: EngineConfig) -> Self {
        Self {
            source,
            catalog: Arc::new(catalog),
            config,
        }
    }

    /// Graphs of one learner: rescaled average scores, attempts and time spent
    ///
    /// # Errors
    ///
    /// Fails on a blank identifier or when the statements cannot be fetched.
    pub async fn progress(&self, identifier: &str) -> Result<ProgressView> {
        let identifier = validate_identifier(identifier)?;
        let batch = self.normalized(identifier, self.config.lrs.progress_limit).await?;

        let aggregates = ProgressAggregator::aggregate(&batch.records);
        let percentages = ScoreNormalizer::new(self.maxima()).rescale_all(&aggregates.average_scores);
        let time_spent = TimeSpent::compute(&batch.records, &self.config.pipeline);

        info!(
            identifier,
            missions = aggregates.mission_levels.len(),
            records = batch.records.len(),
            "Computed progress"
        );

        Ok(ProgressView::build(
            identifier,
            &aggregates,
            &percentages,
            time_spent,
            batch.summary(),
        ))
    }

    /// Scored attempts of one learner, optionally restricted to one mission
    pub async fn attempts(&self, identifier: &str, mission: Option<&str>) -> Result<AttemptsView> {
        let identifier = validate_identifier(identifier)?;
        let mission = mission.map(str::trim).filter(|m| !m.is_empty());
        let batch = self.normalized(identifier, self.config.lrs.progress_limit).await?;

        Ok(AttemptsView::build(identifier, &batch.records, mission, self.maxima()))
    }

    /// Recent statements of one learner, filtered by verb
    ///
    /// An empty verb list keeps every verb.
    pub async fn statements(&self, identifier: &str, verbs: &[String]) -> Result<StatementsView> {
        let identifier = validate_identifier(identifier)?;
        let batch = self.normalized(identifier, self.config.lrs.statements_limit).await?;

        let verbs: BTreeSet<String> = verbs
            .iter()
            .map(|verb| verb.trim())
            .filter(|verb| !verb.is_empty())
            .map(str::to_string)
            .collect();

        Ok(StatementsView::build(identifier, batch.records, &verbs))
    }

    pub fn catalog(&self) -> &MaxScoreCatalog {
        &self.catalog
    }

    /// Maxima of the category used for rescaling, empty when the category is unknown
    pub fn maxima(&self) -> &BTreeMap<String, u32> {
        static EMPTY: OnceLock<BTreeMap<String, u32>> = OnceLock::new();
        self.catalog
            .category(&self.config.catalog.category)
            .unwrap_or_else(|| EMPTY.get_or_init(BTreeMap::new))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    async fn normalized(&self, identifier: &str, limit: usize) -> Result<NormalizedBatch> {
        let raws = self.source.fetch(identifier, limit).await?;
        debug!(identifier, fetched = raws.len(), limit, "Fetched raw statements");

        Ok(StatementNormalizer::from_options(&self.config.pipeline).normalize_all(&raws))
    }
}

fn validate_identifier(identifier: &str) -> Result<&str> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(SdkError::EmptyIdentifier);
    }
    Ok(identifier)
}

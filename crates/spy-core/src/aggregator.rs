//! Per-mission aggregation of normalized records

use crate::model::ActivityRecord;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Aggregates of one learner's records, keyed by mission level
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MissionAggregates {
    /// Every mission level observed
    pub mission_levels: BTreeSet<String>,

    /// Number of "completed" records per mission; missions never completed are absent
    pub completed_counts: BTreeMap<String, u32>,

    /// Recorded scores per mission in record order; empty when no score was recorded
    pub attempt_scores: BTreeMap<String, Vec<f64>>,

    /// Mean of the attempt scores rounded to the nearest integer, none when empty
    pub average_scores: BTreeMap<String, Option<f64>>,
}

impl MissionAggregates {
    pub fn completed_count(&self, level: &str) -> u32 {
        self.completed_counts.get(level).copied().unwrap_or(0)
    }

    /// Number of scored attempts on a mission
    pub fn attempt_count(&self, level: &str) -> usize {
        self.attempt_scores.get(level).map(Vec::len).unwrap_or(0)
    }

    pub fn attempt_counts(&self) -> BTreeMap<String, usize> {
        self.attempt_scores
            .iter()
            .map(|(level, scores)| (level.clone(), scores.len()))
            .collect()
    }
}

/// Aggregator building [`MissionAggregates`] from ordered records
pub struct ProgressAggregator;

impl ProgressAggregator {
    /// Aggregate records; records without a mission level are skipped
    pub fn aggregate(records: &[ActivityRecord]) -> MissionAggregates {
        let mut aggregates = MissionAggregates::default();

        for record in records {
            let Some(level) = record.mission_level.as_deref() else {
                continue;
            };

            aggregates.mission_levels.insert(level.to_string());

            if record.is_completion() {
                *aggregates
                    .completed_counts
                    .entry(level.to_string())
                    .or_insert(0) += 1;
            }

            let scores = aggregates
                .attempt_scores
                .entry(level.to_string())
                .or_default();
            if let Some(score) = record.score {
                scores.push(score);
            }
        }

        aggregates.average_scores = aggregates
            .attempt_scores
            .iter()
            .map(|(level, scores)| (level.clone(), average(scores)))
            .collect();

        aggregates
    }
}

/// Arithmetic mean rounded to the nearest integer, ties to even
pub fn average(scores: &[f64]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    Some(mean.round_ties_even())
}

//! Chart- and table-ready views of the pipeline output

use chrono::{DateTime, Utc};
use serde::Serialize;
use spy_core::aggregator::average;
use spy_core::{ActivityRecord, DropSummary, MissionAggregates, TimeAnomaly, TimeSpent};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::error::{Result, SdkError};

/// Login state of the dashboard page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewState {
    #[default]
    LoggedOut,
    LoggedIn { identifier: String },
}

impl ViewState {
    /// Log in with a free-text identifier; surrounding whitespace is ignored
    pub fn login(identifier: &str) -> Result<Self> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(SdkError::EmptyIdentifier);
        }
        Ok(ViewState::LoggedIn {
            identifier: identifier.to_string(),
        })
    }

    pub fn logout(self) -> Self {
        ViewState::LoggedOut
    }

    pub fn identifier(&self) -> Option<&str> {
        match self {
            ViewState::LoggedIn { identifier } => Some(identifier),
            ViewState::LoggedOut => None,
        }
    }
}

/// One point of a per-mission series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint<T> {
    pub mission_level: String,
    pub value: T,
}

impl<T> SeriesPoint<T> {
    fn new(mission_level: &str, value: T) -> Self {
        Self {
            mission_level: mission_level.to_string(),
            value,
        }
    }
}

/// Graphs view: per-mission scores, attempts and time spent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressView {
    pub identifier: String,

    /// Observed mission levels, sorted; also the mission filter options
    pub mission_levels: Vec<String>,

    /// Average score as a percentage of the mission maximum, 0 when unscored
    pub score_series: Vec<SeriesPoint<f64>>,

    /// Number of scored attempts
    pub attempt_series: Vec<SeriesPoint<usize>>,

    /// Minutes spent, anomalous missions excluded
    pub time_spent_series: Vec<SeriesPoint<f64>>,

    pub completed_counts: BTreeMap<String, u32>,

    /// Missions left out of the time-spent series
    pub anomalies: Vec<TimeAnomaly>,

    pub drops: DropSummary,
}

impl ProgressView {
    pub fn build(
        identifier: &str,
        aggregates: &MissionAggregates,
        percentages: &BTreeMap<String, f64>,
        time_spent: TimeSpent,
        drops: DropSummary,
    ) -> Self {
        let score_series = aggregates
            .mission_levels
            .iter()
            .map(|level| SeriesPoint::new(level, percentages.get(level).copied().unwrap_or(0.0)))
            .collect();

        let attempt_series = aggregates
            .attempt_counts()
            .into_iter()
            .map(|(level, count)| SeriesPoint { mission_level: level, value: count })
            .collect();

        let time_spent_series = time_spent
            .minutes
            .into_iter()
            .map(|(level, minutes)| SeriesPoint { mission_level: level, value: minutes })
            .collect();

        Self {
            identifier: identifier.to_string(),
            mission_levels: aggregates.mission_levels.iter().cloned().collect(),
            score_series,
            attempt_series,
            time_spent_series,
            completed_counts: aggregates.completed_counts.clone(),
            anomalies: time_spent.anomalies,
            drops,
        }
    }
}

/// One scored attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttemptRow {
    /// 1-based attempt number within the mission, in chronological order
    pub attempt: usize,
    pub mission_level: String,
    pub score: f64,
    pub timestamp: DateTime<Utc>,
}

/// Summary of the scores of the displayed attempts
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttemptStats {
    pub highest: Option<f64>,
    /// Mean rounded to the nearest integer
    pub average: Option<f64>,
    pub lowest: Option<f64>,
}

impl AttemptStats {
    fn from_scores(scores: &[f64]) -> Self {
        Self {
            highest: scores.iter().copied().reduce(f64::max),
            average: average(scores),
            lowest: scores.iter().copied().reduce(f64::min),
        }
    }
}

/// Table view: scored attempts of one or every mission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttemptsView {
    pub identifier: String,
    pub mission: Option<String>,
    pub rows: Vec<AttemptRow>,
    pub stats: AttemptStats,
    /// Three-stars score of the selected mission, when known
    pub max_score: Option<u32>,
}

impl AttemptsView {
    /// Build the table from records; only non-zero scores count as attempts
    pub fn build(
        identifier: &str,
        records: &[ActivityRecord],
        mission: Option<&str>,
        maxima: &BTreeMap<String, u32>,
    ) -> Self {
        let mut scored: Vec<(&str, f64, DateTime<Utc>)> = records
            .iter()
            .filter_map(|record| {
                let level = record.mission_level.as_deref()?;
                let score = record.score.filter(|score| *score != 0.0)?;
                Some((level, score, record.timestamp))
            })
            .collect();
        scored.sort_by_key(|(_, _, timestamp)| *timestamp);

        let mut counters: BTreeMap<&str, usize> = BTreeMap::new();
        let rows: Vec<AttemptRow> = scored
            .into_iter()
            .map(|(level, score, timestamp)| {
                let counter = counters.entry(level).or_insert(0);
                *counter += 1;
                AttemptRow {
                    attempt: *counter,
                    mission_level: level.to_string(),
                    score,
                    timestamp,
                }
            })
            .filter(|row| mission.map_or(true, |m| row.mission_level == m))
            .collect();

        let scores: Vec<f64> = rows.iter().map(|row| row.score).collect();

        Self {
            identifier: identifier.to_string(),
            mission: mission.map(str::to_string),
            stats: AttemptStats::from_scores(&scores),
            max_score: mission.and_then(|m| maxima.get(m).copied()),
            rows,
        }
    }
}

/// Statement table: one row per distinct action, in chronological order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementsView {
    pub identifier: String,
    pub rows: Vec<ActivityRecord>,
    /// Distinct verbs of the unfiltered rows, sorted
    pub verb_options: Vec<String>,
}

impl StatementsView {
    /// Sort records, drop duplicates of (score, mission, timestamp) and filter by verb
    ///
    /// An empty verb set keeps every row.
    pub fn build(identifier: &str, mut records: Vec<ActivityRecord>, verbs: &BTreeSet<String>) -> Self {
        records.sort_by_key(|record| record.timestamp);

        let mut seen = HashSet::new();
        records.retain(|record| {
            seen.insert((
                record.score.map(f64::to_bits),
                record.mission_level.clone(),
                record.timestamp,
            ))
        });

        let verb_options: BTreeSet<String> = records.iter().map(|r| r.verb.clone()).collect();

        if !verbs.is_empty() {
            records.retain(|record| verbs.contains(&record.verb));
        }

        Self {
            identifier: identifier.to_string(),
            rows: records,
            verb_options: verb_options.into_iter().collect(),
        }
    }
}

//! Time spent per mission
//!
//! Derived from the timestamps of the records of each mission, independent of
//! their arrival order. Totals above the anomaly threshold usually mean a
//! mission was resumed days later; they are reported and left out.

use crate::model::ActivityRecord;
use crate::options::{PipelineOptions, TimeSpentMode};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// A per-mission total excluded from the result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeAnomaly {
    pub mission_level: String,
    pub minutes: f64,
}

/// Minutes spent per mission
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeSpent {
    pub minutes: BTreeMap<String, f64>,
    pub anomalies: Vec<TimeAnomaly>,
}

impl TimeSpent {
    /// Compute time spent per mission; records without a mission level are ignored
    pub fn compute(records: &[ActivityRecord], options: &PipelineOptions) -> Self {
        let mut by_level: BTreeMap<&str, Vec<DateTime<Utc>>> = BTreeMap::new();
        for record in records {
            if let Some(level) = record.mission_level.as_deref() {
                by_level.entry(level).or_default().push(record.timestamp);
            }
        }

        if by_level.is_empty() {
            debug!("No mission level found in records, no time spent computed");
            return Self::default();
        }

        let mut time_spent = Self::default();
        for (level, mut timestamps) in by_level {
            timestamps.sort();
            let minutes = match options.time_spent {
                TimeSpentMode::SessionGap => session_minutes(&timestamps, options.session_gap_minutes),
                TimeSpentMode::Span => span_minutes(&timestamps),
            };

            if minutes > options.anomaly_threshold_minutes {
                warn!(
                    mission_level = level,
                    minutes, "Time spent above anomaly threshold, excluding mission"
                );
                time_spent.anomalies.push(TimeAnomaly {
                    mission_level: level.to_string(),
                    minutes,
                });
            } else {
                time_spent.minutes.insert(level.to_string(), minutes);
            }
        }

        time_spent
    }
}

fn minutes_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_milliseconds() as f64 / 60_000.0
}

/// Sum of consecutive gaps, a gap above `max_gap` counting as zero
fn session_minutes(sorted: &[DateTime<Utc>], max_gap: f64) -> f64 {
    sorted
        .windows(2)
        .map(|pair| minutes_between(pair[0], pair[1]))
        .filter(|gap| *gap <= max_gap)
        .sum()
}

fn span_minutes(sorted: &[DateTime<Utc>]) -> f64 {
    match (sorted.first(), sorted.last()) {
        (Some(first), Some(last)) => minutes_between(*first, *last),
        _ => 0.0,
    }
}

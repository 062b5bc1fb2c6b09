//! Pipeline options
//!
//! The event stream comes from several game builds that disagree on a couple
//! of details, so the two policies that differ between them are explicit.

use serde::{Deserialize, Serialize};

/// What to record as the score of an unsuccessful attempt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsuccessfulScorePolicy {
    /// The score is absent and does not count as an attempt
    #[default]
    Absent,
    /// The score is recorded as a literal 0
    Zero,
}

/// How time spent on a mission is derived from its timestamps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSpentMode {
    /// Sum of consecutive gaps, ignoring gaps longer than the session gap
    #[default]
    SessionGap,
    /// Latest minus earliest timestamp
    Span,
}

/// Options of one fetch-normalize-aggregate-rescale run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Score recorded for unsuccessful attempts
    #[serde(default)]
    pub unsuccessful_score: UnsuccessfulScorePolicy,

    /// Time-spent formula
    #[serde(default)]
    pub time_spent: TimeSpentMode,

    /// Gaps above this many minutes are treated as a break between sessions
    #[serde(default = "default_session_gap_minutes")]
    pub session_gap_minutes: f64,

    /// Per-mission totals above this many minutes are reported and excluded
    #[serde(default = "default_anomaly_threshold_minutes")]
    pub anomaly_threshold_minutes: f64,
}

fn default_session_gap_minutes() -> f64 {
    60.0
}

fn default_anomaly_threshold_minutes() -> f64 {
    24.0 * 60.0
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            unsuccessful_score: UnsuccessfulScorePolicy::default(),
            time_spent: TimeSpentMode::default(),
            session_gap_minutes: default_session_gap_minutes(),
            anomaly_threshold_minutes: default_anomaly_threshold_minutes(),
        }
    }
}

impl PipelineOptions {
    pub fn with_unsuccessful_score(mut self, policy: UnsuccessfulScorePolicy) -> Self {
        self.unsuccessful_score = policy;
        self
    }

    pub fn with_time_spent(mut self, mode: TimeSpentMode) -> Self {
        self.time_spent = mode;
        self
    }
}

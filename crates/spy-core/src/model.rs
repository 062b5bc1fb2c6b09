//! Typed records produced from raw xAPI statements

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw statement as returned by the event store
///
/// Fields are read defensively: absence is not an error by itself.
pub type RawStatement = serde_json::Value;

/// One learner action, normalized from a raw statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// When the action happened
    pub timestamp: DateTime<Utc>,

    /// Last path segment of the verb URI (e.g. "completed")
    pub verb: String,

    /// Actor display name, "Unknown" when absent
    pub actor: String,

    /// Activity URI, "Unknown" when absent
    pub object: String,

    /// Score of the attempt, absent when missing or unsuccessful
    pub score: Option<f64>,

    /// Mission the action belongs to, carried forward from earlier records
    pub mission_level: Option<String>,

    /// Contextual scenario tag
    pub scenario: Option<String>,
}

impl ActivityRecord {
    /// Whether the verb is "completed"
    pub fn is_completion(&self) -> bool {
        self.verb == "completed"
    }
}

/// Loop-carried state of the normalizer: the last mission level seen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissionCarry {
    last_level: Option<String>,
}

impl MissionCarry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last non-null mission level observed so far
    pub fn last_level(&self) -> Option<&str> {
        self.last_level.as_deref()
    }

    /// Resolve the mission level of the current record
    ///
    /// An explicit level wins and becomes the new carried value; otherwise the
    /// carried value (possibly none) is inherited and the state is unchanged.
    pub fn resolve(self, observed: Option<String>) -> (Option<String>, MissionCarry) {
        match observed {
            Some(level) => (
                Some(level.clone()),
                MissionCarry {
                    last_level: Some(level),
                },
            ),
            None => (self.last_level.clone(), self),
        }
    }
}

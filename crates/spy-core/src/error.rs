//! Error types for SPY Core

use thiserror::Error;

/// Reason a raw statement was discarded by the normalizer
///
/// Statements come from an externally produced event stream that is not
/// schema-enforced, so extraction failures drop the statement instead of
/// failing the whole batch. The reason is kept for observability.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    #[error("Statement is not a JSON object")]
    NotAnObject,

    #[error("Missing timestamp")]
    MissingTimestamp,

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Missing verb id")]
    MissingVerb,

    #[error("Missing actor")]
    MissingActor,

    #[error("Missing object")]
    MissingObject,

    #[error("Unparsable score: {0}")]
    UnparsableScore(String),

    #[error("Malformed mission level: {0}")]
    MalformedMissionLevel(String),

    #[error("Malformed scenario: {0}")]
    MalformedScenario(String),
}

impl DropReason {
    /// Stable short label, used as the key of drop summaries
    pub fn kind(&self) -> &'static str {
        match self {
            DropReason::NotAnObject => "not_an_object",
            DropReason::MissingTimestamp => "missing_timestamp",
            DropReason::InvalidTimestamp(_) => "invalid_timestamp",
            DropReason::MissingVerb => "missing_verb",
            DropReason::MissingActor => "missing_actor",
            DropReason::MissingObject => "missing_object",
            DropReason::UnparsableScore(_) => "unparsable_score",
            DropReason::MalformedMissionLevel(_) => "malformed_mission_level",
            DropReason::MalformedScenario(_) => "malformed_scenario",
        }
    }
}

pub type Result<T> = std::result::Result<T, DropReason>;

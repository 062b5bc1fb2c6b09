//! Statement normalization
//!
//! Converts raw xAPI statements into [`ActivityRecord`]s. Normalization is a
//! left fold over the statement sequence: a statement without an explicit
//! mission level inherits the one of the nearest preceding record, so the
//! input must be processed in arrival order and never in parallel.

use crate::error::{DropReason, Result};
use crate::model::{ActivityRecord, MissionCarry, RawStatement};
use crate::options::{PipelineOptions, UnsuccessfulScorePolicy};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Result extension holding the score of an attempt
pub const SCORE_EXTENSION: &str = "https://spy.lip6.fr/xapi/extensions/score";

/// Activity definition extension holding the mission level
pub const PROGRESS_EXTENSION: &str = "https://w3id.org/xapi/seriousgames/extensions/progress";

/// Activity definition extension holding the scenario tag
pub const CONTEXT_EXTENSION: &str = "https://spy.lip6.fr/xapi/extensions/context";

const UNKNOWN: &str = "Unknown";

/// A statement the normalizer discarded, with its position in the input
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedStatement {
    pub index: usize,
    pub reason: DropReason,
}

/// Output of normalizing a whole statement sequence
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    /// Records in input order
    pub records: Vec<ActivityRecord>,
    /// Statements that could not be normalized
    pub drops: Vec<DroppedStatement>,
}

impl NormalizedBatch {
    pub fn summary(&self) -> DropSummary {
        let mut reasons = BTreeMap::new();
        for drop in &self.drops {
            *reasons.entry(drop.reason.kind().to_string()).or_insert(0) += 1;
        }

        DropSummary {
            total: self.records.len() + self.drops.len(),
            kept: self.records.len(),
            dropped: self.drops.len(),
            reasons,
        }
    }
}

/// Counts of kept and dropped statements, by drop reason
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DropSummary {
    pub total: usize,
    pub kept: usize,
    pub dropped: usize,
    pub reasons: BTreeMap<String, usize>,
}

/// Fields extracted from one statement, before carry-forward is applied
struct Extracted {
    timestamp: DateTime<Utc>,
    verb: String,
    actor: String,
    object: String,
    score: Option<f64>,
    mission_level: Option<String>,
    scenario: Option<String>,
}

/// Normalizer for raw xAPI statements
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementNormalizer {
    unsuccessful_score: UnsuccessfulScorePolicy,
}

impl StatementNormalizer {
    /// Create a normalizer with an explicit policy for unsuccessful attempts
    pub fn new(unsuccessful_score: UnsuccessfulScorePolicy) -> Self {
        Self { unsuccessful_score }
    }

    pub fn from_options(options: &PipelineOptions) -> Self {
        Self::new(options.unsuccessful_score)
    }

    /// Normalize one statement against the carried mission state
    ///
    /// The carry advances only when a record is produced and it carried an
    /// explicit mission level.
    pub fn normalize(
        &self,
        raw: &RawStatement,
        carry: MissionCarry,
    ) -> (Result<ActivityRecord>, MissionCarry) {
        match self.extract(raw) {
            Ok(fields) => {
                let (mission_level, carry) = carry.resolve(fields.mission_level);
                let record = ActivityRecord {
                    timestamp: fields.timestamp,
                    verb: fields.verb,
                    actor: fields.actor,
                    object: fields.object,
                    score: fields.score,
                    mission_level,
                    scenario: fields.scenario,
                };
                (Ok(record), carry)
            }
            Err(reason) => (Err(reason), carry),
        }
    }

    /// Normalize a statement sequence in arrival order
    pub fn normalize_all(&self, raws: &[RawStatement]) -> NormalizedBatch {
        let (batch, _) = raws.iter().enumerate().fold(
            (NormalizedBatch::default(), MissionCarry::new()),
            |(mut batch, carry), (index, raw)| {
                let (outcome, carry) = self.normalize(raw, carry);
                match outcome {
                    Ok(record) => batch.records.push(record),
                    Err(reason) => {
                        debug!(index, %reason, "Dropping statement");
                        batch.drops.push(DroppedStatement { index, reason });
                    }
                }
                (batch, carry)
            },
        );

        if !batch.drops.is_empty() {
            info!(
                "Normalized {} of {} statements ({} dropped)",
                batch.records.len(),
                raws.len(),
                batch.drops.len()
            );
        }

        batch
    }

    fn extract(&self, raw: &RawStatement) -> Result<Extracted> {
        let statement = raw.as_object().ok_or(DropReason::NotAnObject)?;

        let timestamp = match statement.get("timestamp") {
            None | Some(Value::Null) => return Err(DropReason::MissingTimestamp),
            Some(Value::String(s)) => parse_timestamp(s)?,
            Some(other) => return Err(DropReason::InvalidTimestamp(other.to_string())),
        };

        let verb_id = statement
            .get("verb")
            .and_then(|verb| verb.get("id"))
            .and_then(Value::as_str)
            .ok_or(DropReason::MissingVerb)?;

        let actor = statement
            .get("actor")
            .and_then(Value::as_object)
            .ok_or(DropReason::MissingActor)?;

        let object = statement
            .get("object")
            .and_then(Value::as_object)
            .ok_or(DropReason::MissingObject)?;

        let result = statement.get("result");
        let success = result
            .and_then(|r| r.get("success"))
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let score = if success {
            let raw_score = result
                .and_then(|r| r.get("extensions"))
                .and_then(|ext| ext.get(SCORE_EXTENSION));
            coerce_score(raw_score)?
        } else {
            match self.unsuccessful_score {
                UnsuccessfulScorePolicy::Absent => None,
                UnsuccessfulScorePolicy::Zero => Some(0.0),
            }
        };

        let extensions = object
            .get("definition")
            .and_then(|definition| definition.get("extensions"));

        let mission_level = first_tag(extensions.and_then(|ext| ext.get(PROGRESS_EXTENSION)))
            .map_err(DropReason::MalformedMissionLevel)?;
        let scenario = first_tag(extensions.and_then(|ext| ext.get(CONTEXT_EXTENSION)))
            .map_err(DropReason::MalformedScenario)?;

        Ok(Extracted {
            timestamp,
            verb: last_segment(verb_id).to_string(),
            actor: actor
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or(UNKNOWN)
                .to_string(),
            object: object
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or(UNKNOWN)
                .to_string(),
            score,
            mission_level,
            scenario,
        })
    }
}

/// Parse an xAPI timestamp; zone-less timestamps are read as UTC
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| DropReason::InvalidTimestamp(s.to_string()))
}

fn last_segment(uri: &str) -> &str {
    uri.rsplit_once('/').map(|(_, tail)| tail).unwrap_or(uri)
}

/// Coerce the score extension of a successful attempt
///
/// A one-element sequence is unwrapped and numeric strings are parsed. A
/// string that is not a number drops the statement; any other shape simply
/// yields no score.
fn coerce_score(value: Option<&Value>) -> Result<Option<f64>> {
    let value = match value {
        None => return Ok(None),
        Some(Value::Array(items)) => match items.first() {
            Some(first) => first,
            None => return Ok(None),
        },
        Some(other) => other,
    };

    match value {
        Value::Number(n) => Ok(n.as_f64()),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(parsed) if parsed.is_finite() => Ok(Some(parsed)),
            _ => Err(DropReason::UnparsableScore(s.clone())),
        },
        _ => Ok(None),
    }
}

/// Read a tag stored as the first element of a sequence extension
fn first_tag(value: Option<&Value>) -> std::result::Result<Option<String>, String> {
    let value = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items
            .first()
            .ok_or_else(|| "empty sequence".to_string())?,
        Some(other) => other,
    };

    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn statement(level: Option<&str>) -> Value {
        let mut raw = json!({
            "timestamp": "2025-01-10T09:00:00Z",
            "verb": { "id": "http://adlnet.gov/expapi/verbs/launched" },
            "actor": { "name": "A64881E9" },
            "object": { "id": "https://spy.lip6.fr/level", "definition": { "extensions": {} } }
        });
        if let Some(level) = level {
            raw["object"]["definition"]["extensions"][PROGRESS_EXTENSION] = json!([level]);
        }
        raw
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(last_segment("http://adlnet.gov/expapi/verbs/completed"), "completed");
        assert_eq!(last_segment("completed"), "completed");
        assert_eq!(last_segment("http://x/verbs/"), "");
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let with_zone = parse_timestamp("2025-01-10T10:00:00+01:00").unwrap();
        let utc = parse_timestamp("2025-01-10T09:00:00Z").unwrap();
        let naive = parse_timestamp("2025-01-10T09:00:00.000").unwrap();
        assert_eq!(with_zone, utc);
        assert_eq!(naive, utc);
        assert!(matches!(
            parse_timestamp("not a date"),
            Err(DropReason::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_coerce_score_shapes() {
        assert_eq!(coerce_score(Some(&json!([42]))).unwrap(), Some(42.0));
        assert_eq!(coerce_score(Some(&json!("17.5"))).unwrap(), Some(17.5));
        assert_eq!(coerce_score(Some(&json!(["8"]))).unwrap(), Some(8.0));
        assert_eq!(coerce_score(Some(&json!([]))).unwrap(), None);
        assert_eq!(coerce_score(Some(&json!({"value": 3}))).unwrap(), None);
        assert_eq!(coerce_score(Some(&json!(true))).unwrap(), None);
        assert_eq!(coerce_score(None).unwrap(), None);
        assert!(matches!(
            coerce_score(Some(&json!("abc"))),
            Err(DropReason::UnparsableScore(_))
        ));
    }

    #[test]
    fn test_first_tag_shapes() {
        assert_eq!(first_tag(Some(&json!(["mission04"]))).unwrap().as_deref(), Some("mission04"));
        assert_eq!(first_tag(Some(&json!("mission04"))).unwrap().as_deref(), Some("mission04"));
        assert_eq!(first_tag(Some(&json!([7]))).unwrap().as_deref(), Some("7"));
        assert_eq!(first_tag(Some(&json!([null]))).unwrap(), None);
        assert_eq!(first_tag(None).unwrap(), None);
        assert!(first_tag(Some(&json!([]))).is_err());
        assert!(first_tag(Some(&json!([{"a": 1}]))).is_err());
    }

    #[test]
    fn test_carry_not_advanced_by_dropped_statement() {
        let normalizer = StatementNormalizer::default();
        let mut broken = statement(Some("mission09"));
        broken.as_object_mut().unwrap().remove("verb");

        let (outcome, carry) = normalizer.normalize(&broken, MissionCarry::new());
        assert_eq!(outcome, Err(DropReason::MissingVerb));
        assert!(carry.last_level().is_none());

        let (outcome, _) = normalizer.normalize(&statement(None), carry);
        assert!(outcome.unwrap().mission_level.is_none());
    }

    #[test]
    fn test_batch_summary_counts_reasons() {
        let normalizer = StatementNormalizer::default();
        let raws = vec![
            statement(Some("mission01")),
            json!("not an object"),
            json!({ "verb": { "id": "x/completed" } }),
            json!(42),
        ];

        let summary = normalizer.normalize_all(&raws).summary();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.kept, 1);
        assert_eq!(summary.dropped, 3);
        assert_eq!(summary.reasons["not_an_object"], 2);
        assert_eq!(summary.reasons["missing_timestamp"], 1);
    }
}

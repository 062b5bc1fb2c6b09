//! SPY Core - typed records and the statement-to-metrics pipeline
//!
//! This crate turns the loosely structured xAPI statements a learner's game
//! session produces into per-mission metrics:
//! - [`normalizer`]: raw statement to [`ActivityRecord`], with mission carry-forward
//! - [`aggregator`]: per-mission attempts, completions and average scores
//! - [`time_spent`]: minutes spent per mission, with anomaly suppression
//! - [`score`]: rescaling of raw averages to a 0-100 percentage
//!
//! # Example
//!
//! ```
//! use spy_core::{ProgressAggregator, StatementNormalizer};
//! use serde_json::json;
//!
//! let raws = vec![json!({
//!     "timestamp": "2025-01-10T09:00:00Z",
//!     "verb": { "id": "http://adlnet.gov/expapi/verbs/completed" },
//!     "actor": { "name": "C2ED0A43" },
//!     "object": {
//!         "id": "https://spy.lip6.fr/mission01",
//!         "definition": { "extensions": {
//!             "https://w3id.org/xapi/seriousgames/extensions/progress": ["mission01"]
//!         }}
//!     },
//!     "result": { "success": true, "extensions": {
//!         "https://spy.lip6.fr/xapi/extensions/score": [50]
//!     }}
//! })];
//!
//! let batch = StatementNormalizer::default().normalize_all(&raws);
//! let aggregates = ProgressAggregator::aggregate(&batch.records);
//! assert_eq!(aggregates.average_scores["mission01"], Some(50.0));
//! ```

pub mod aggregator;
pub mod error;
pub mod model;
pub mod normalizer;
pub mod options;
pub mod score;
pub mod time_spent;

pub use aggregator::{MissionAggregates, ProgressAggregator};
pub use error::DropReason;
pub use model::{ActivityRecord, MissionCarry, RawStatement};
pub use normalizer::{DropSummary, DroppedStatement, NormalizedBatch, StatementNormalizer};
pub use options::{PipelineOptions, TimeSpentMode, UnsuccessfulScorePolicy};
pub use score::ScoreNormalizer;
pub use time_spent::{TimeAnomaly, TimeSpent};

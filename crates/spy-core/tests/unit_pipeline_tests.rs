//! Tests for the statement-to-metrics pipeline
//!
//! These tests drive the normalizer, aggregator, time-spent derivation and
//! score normalizer together over realistic statement sequences.

use serde_json::{json, Value};
use spy_core::normalizer::{PROGRESS_EXTENSION, SCORE_EXTENSION};
use spy_core::{
    DropReason, PipelineOptions, ProgressAggregator, ScoreNormalizer, StatementNormalizer,
    TimeSpent, UnsuccessfulScorePolicy,
};
use std::collections::BTreeMap;

/// Helper to build a statement at `minute` minutes after 09:00
fn statement(minute: u32, verb: &str, level: Option<&str>, success: bool, score: Option<Value>) -> Value {
    let mut raw = json!({
        "timestamp": format!("2025-01-10T{:02}:{:02}:00Z", 9 + minute / 60, minute % 60),
        "verb": { "id": format!("http://adlnet.gov/expapi/verbs/{}", verb) },
        "actor": { "name": "C2ED0A43" },
        "object": { "id": "https://spy.lip6.fr/xapi/activities/level", "definition": { "extensions": {} } },
        "result": { "success": success, "extensions": {} }
    });
    if let Some(level) = level {
        raw["object"]["definition"]["extensions"][PROGRESS_EXTENSION] = json!([level]);
    }
    if let Some(score) = score {
        raw["result"]["extensions"][SCORE_EXTENSION] = score;
    }
    raw
}

#[test]
fn test_carry_forward_law() {
    let raws = vec![
        statement(0, "launched", None, false, None),
        statement(1, "launched", Some("mission01"), false, None),
        statement(2, "completed", None, true, Some(json!([10]))),
        statement(3, "launched", Some("mission02"), false, None),
        statement(4, "exited", None, false, None),
        statement(5, "exited", None, false, None),
    ];

    let batch = StatementNormalizer::default().normalize_all(&raws);
    let levels: Vec<Option<&str>> = batch
        .records
        .iter()
        .map(|r| r.mission_level.as_deref())
        .collect();

    assert_eq!(
        levels,
        vec![
            None,
            Some("mission01"),
            Some("mission01"),
            Some("mission02"),
            Some("mission02"),
            Some("mission02"),
        ]
    );
}

#[test]
fn test_dropped_statements_preserve_order() {
    let mut missing_actor = statement(2, "completed", Some("mission02"), true, Some(json!([5])));
    missing_actor.as_object_mut().unwrap().remove("actor");

    let raws = vec![
        statement(0, "launched", Some("mission01"), false, None),
        missing_actor,
        statement(3, "completed", None, true, Some(json!("not-a-number"))),
        statement(4, "completed", None, true, Some(json!([30]))),
        json!(null),
    ];

    let batch = StatementNormalizer::default().normalize_all(&raws);
    assert_eq!(batch.records.len(), raws.len() - 3);
    assert_eq!(batch.records[0].verb, "launched");
    assert_eq!(batch.records[1].score, Some(30.0));

    // The dropped mission02 statement never advanced the carry
    assert_eq!(batch.records[1].mission_level.as_deref(), Some("mission01"));

    let reasons: Vec<&DropReason> = batch.drops.iter().map(|d| &d.reason).collect();
    assert_eq!(reasons[0], &DropReason::MissingActor);
    assert!(matches!(reasons[1], DropReason::UnparsableScore(_)));
    assert_eq!(reasons[2], &DropReason::NotAnObject);
    assert_eq!(
        batch.drops.iter().map(|d| d.index).collect::<Vec<_>>(),
        vec![1, 2, 4]
    );
}

#[test]
fn test_unsuccessful_score_absent_policy() {
    let raws = vec![statement(0, "completed", Some("mission01"), false, Some(json!([45])))];
    let batch = StatementNormalizer::new(UnsuccessfulScorePolicy::Absent).normalize_all(&raws);
    assert_eq!(batch.records[0].score, None);

    let aggregates = ProgressAggregator::aggregate(&batch.records);
    assert!(aggregates.attempt_scores["mission01"].is_empty());
    assert_eq!(aggregates.average_scores["mission01"], None);
}

#[test]
fn test_unsuccessful_score_zero_policy() {
    let raws = vec![
        statement(0, "completed", Some("mission01"), false, Some(json!([45]))),
        statement(1, "completed", None, true, Some(json!([80]))),
    ];
    let batch = StatementNormalizer::new(UnsuccessfulScorePolicy::Zero).normalize_all(&raws);
    assert_eq!(batch.records[0].score, Some(0.0));

    let aggregates = ProgressAggregator::aggregate(&batch.records);
    assert_eq!(aggregates.attempt_scores["mission01"], vec![0.0, 80.0]);
    assert_eq!(aggregates.average_scores["mission01"], Some(40.0));
}

#[test]
fn test_missing_success_flag_means_unsuccessful() {
    let mut raw = statement(0, "completed", Some("mission01"), true, Some(json!([45])));
    raw["result"].as_object_mut().unwrap().remove("success");

    let batch = StatementNormalizer::default().normalize_all(&[raw]);
    assert_eq!(batch.records[0].score, None);
}

#[test]
fn test_defaults_for_actor_and_object() {
    let mut raw = statement(0, "launched", Some("mission01"), false, None);
    raw["actor"] = json!({});
    raw["object"] = json!({});

    let batch = StatementNormalizer::default().normalize_all(&[raw]);
    assert_eq!(batch.records[0].actor, "Unknown");
    assert_eq!(batch.records[0].object, "Unknown");
    assert_eq!(batch.records[0].mission_level, None);
}

#[test]
fn test_scenario_is_independent_of_level() {
    let mut raw = statement(0, "launched", None, false, None);
    raw["object"]["definition"]["extensions"]["https://spy.lip6.fr/xapi/extensions/context"] =
        json!(["Infiltration"]);

    let batch = StatementNormalizer::default().normalize_all(&[raw]);
    assert_eq!(batch.records[0].scenario.as_deref(), Some("Infiltration"));
    assert_eq!(batch.records[0].mission_level, None);
}

#[test]
fn test_averages_and_rescaling() {
    let raws = vec![
        statement(0, "completed", Some("mission01"), true, Some(json!([60]))),
        statement(5, "completed", None, true, Some(json!(["80"]))),
        statement(9, "completed", None, true, Some(json!(100))),
    ];

    let batch = StatementNormalizer::default().normalize_all(&raws);
    let aggregates = ProgressAggregator::aggregate(&batch.records);
    assert_eq!(aggregates.average_scores["mission01"], Some(80.0));

    let maxima = BTreeMap::from([("mission01".to_string(), 100)]);
    let rescaled = ScoreNormalizer::new(&maxima).rescale_all(&aggregates.average_scores);
    assert_eq!(rescaled["mission01"], 80.0);
}

#[test]
fn test_end_to_end_learner_scenario() {
    let raws = vec![
        statement(0, "completed", Some("mission01"), true, Some(json!([50]))),
        statement(10, "completed", Some("mission01"), true, Some(json!([70]))),
        statement(20, "launched", Some("mission02"), false, None),
    ];

    let options = PipelineOptions::default();
    let batch = StatementNormalizer::from_options(&options).normalize_all(&raws);
    let aggregates = ProgressAggregator::aggregate(&batch.records);

    assert_eq!(
        aggregates.mission_levels.iter().collect::<Vec<_>>(),
        vec!["mission01", "mission02"]
    );
    assert_eq!(aggregates.average_scores["mission01"], Some(60.0));
    assert!(aggregates.attempt_scores["mission02"].is_empty());

    let maxima = BTreeMap::from([("mission01".to_string(), 100)]);
    let rescaled = ScoreNormalizer::new(&maxima).rescale_all(&aggregates.average_scores);
    assert_eq!(rescaled["mission01"], 60.0);
    assert_eq!(rescaled["mission02"], 0.0);

    let time_spent = TimeSpent::compute(&batch.records, &options);
    assert_eq!(time_spent.minutes["mission01"], 10.0);
    assert_eq!(time_spent.minutes["mission02"], 0.0);
}

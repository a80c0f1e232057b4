//! Archive Reader Integration Tests
//!
//! Tests for the CloudTrail S3 log archive path: envelope parsing, fatal
//! failure modes, ordering, and the property that an archived event and the
//! same event's live body produce identical records (both resolve through
//! the action-name table when no structured refs are present).

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::io::Write as _;
use tempfile::NamedTempFile;
use trailtag::app::query::JaqEvaluator;
use trailtag::app::{archive, EventPipeline, ParseConfig};

fn write_archive(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn run_archive(config: &ParseConfig, content: &str) -> anyhow::Result<Vec<String>> {
    let file = write_archive(content);
    let evaluator = JaqEvaluator::new();
    let pipeline = EventPipeline::new(config, &evaluator);
    let mut out = Vec::new();
    archive::parse_from_file(file.path(), &pipeline, &mut out)?;
    Ok(String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect())
}

fn create_bucket_record(bucket: &str) -> Value {
    json!({
        "eventName": "CreateBucket",
        "requestParameters": { "bucketName": bucket },
        "userIdentity": { "arn": "arn:aws:iam::123:user/alice" }
    })
}

#[test]
fn archive_events_flow_through_the_pipeline_in_order() {
    let envelope = json!({
        "Records": [create_bucket_record("bucket-one"), create_bucket_record("bucket-two")]
    });
    let lines = run_archive(&ParseConfig::default(), &envelope.to_string()).unwrap();
    assert_eq!(lines.len(), 2);
    let first: Value = serde_json::from_str(&lines[0]).unwrap();
    let second: Value = serde_json::from_str(&lines[1]).unwrap();
    assert_eq!(first["TaggingMetadata"]["ResourceName"], "bucket-one");
    assert_eq!(second["TaggingMetadata"]["ResourceName"], "bucket-two");
}

#[test]
fn unmappable_records_are_skipped_silently() {
    let envelope = json!({
        "Records": [
            json!({ "eventName": "UnknownAction" }),
            create_bucket_record("survivor")
        ]
    });
    let lines = run_archive(&ParseConfig::default(), &envelope.to_string()).unwrap();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("survivor"));
}

#[test]
fn empty_record_list_produces_no_output() {
    let lines = run_archive(&ParseConfig::default(), r#"{"Records": []}"#).unwrap();
    assert!(lines.is_empty());
}

#[test]
fn unparsable_envelope_is_fatal() {
    assert!(run_archive(&ParseConfig::default(), "not json at all").is_err());
}

#[test]
fn missing_file_is_fatal() {
    let evaluator = JaqEvaluator::new();
    let config = ParseConfig::default();
    let pipeline = EventPipeline::new(&config, &evaluator);
    let mut out = Vec::new();
    let result = archive::parse_from_file("/nonexistent/trail.json", &pipeline, &mut out);
    assert!(result.is_err());
}

#[test]
fn archived_and_live_bodies_produce_identical_records() {
    // An archive entry and a live event body with no structured refs both
    // take the table fallback path and must agree byte for byte.
    let body = create_bucket_record("round-trip-bucket");
    let config = ParseConfig {
        tag_patterns: vec!["{CreatedBy: .userIdentity.arn}".to_string()],
        ..ParseConfig::default()
    };

    let envelope = json!({ "Records": [body.clone()] });
    let archive_lines = run_archive(&config, &envelope.to_string()).unwrap();

    let evaluator = JaqEvaluator::new();
    let pipeline = EventPipeline::new(&config, &evaluator);
    let mut out = Vec::new();
    pipeline.process_event(&body, &[], None, &mut out).unwrap();
    let live_lines: Vec<String> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();

    assert_eq!(archive_lines, live_lines);
    assert_eq!(archive_lines.len(), 1);
}

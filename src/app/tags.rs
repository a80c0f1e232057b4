//! Tag extraction.
//!
//! Each configured tag pattern is evaluated against the raw event body and
//! every object the patterns yield is merged into one tag set, later
//! patterns overwriting earlier keys. Tag values are coerced with a total
//! rule: `null` becomes the empty string, strings pass through, other
//! scalars keep their JSON literal form, and objects/arrays are shape errors
//! for that key.

use crate::app::query::QueryEvaluator;
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

fn coerce_tag_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::String(s) => Some(s.clone()),
        Value::Bool(_) | Value::Number(_) => Some(value.to_string()),
        Value::Object(_) | Value::Array(_) => None,
    }
}

/// Evaluate all configured tag patterns against the raw event and merge the
/// resulting objects into one tag set.
///
/// An empty pattern list yields an empty set. Evaluation failure of any
/// pattern aborts the whole extraction: the caller drops the event, reports
/// the error, and moves on to the next one. A pattern result that is not a
/// JSON object ends that pattern's merge; keys already merged are kept.
pub fn extract_tags(
    evaluator: &dyn QueryEvaluator,
    raw_event: &str,
    patterns: &[String],
) -> Result<BTreeMap<String, String>> {
    let mut all_tags = BTreeMap::new();
    if patterns.is_empty() {
        return Ok(all_tags);
    }

    for pattern in patterns {
        let results = evaluator
            .eval(raw_event, pattern)
            .with_context(|| format!("tag pattern evaluation failed: {pattern}"))?;

        for result in results {
            let Value::Object(map) = result else {
                warn!(%pattern, "tag pattern result is not an object, stopping merge");
                break;
            };

            for (key, value) in &map {
                match coerce_tag_value(value) {
                    Some(coerced) => {
                        all_tags.insert(key.clone(), coerced);
                    }
                    None => {
                        warn!(%pattern, %key, "tag value is not a scalar, skipping key");
                    }
                }
            }
        }
    }

    Ok(all_tags)
}

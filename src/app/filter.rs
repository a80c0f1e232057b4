//! Boolean filter chain.
//!
//! Every configured filter pattern is evaluated against the fully assembled
//! output record. The chain is conjunctive: all patterns must yield the
//! literal boolean `true` for the record to be emitted, and evaluation stops
//! at the first failure. Rejection is the intended mechanism for excluding
//! uninteresting events, not an error.

use crate::app::query::QueryEvaluator;
use tracing::debug;

/// Decide whether an assembled record passes every configured filter.
///
/// A record is rejected if any pattern errors, yields zero results, or
/// yields a first result whose JSON form is not exactly `true`. An empty
/// pattern list always passes.
pub fn matches_filters(
    evaluator: &dyn QueryEvaluator,
    record_json: &str,
    patterns: &[String],
) -> bool {
    for pattern in patterns {
        let results = match evaluator.eval(record_json, pattern) {
            Ok(results) => results,
            Err(err) => {
                debug!(%pattern, error = %err, "filter pattern failed, rejecting record");
                return false;
            }
        };

        let passed = results
            .first()
            .map(|r| r.to_string() == "true")
            .unwrap_or(false);
        if !passed {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::query::JaqEvaluator;

    fn patterns(names: &[&str]) -> Vec<String> {
        names.iter().map(|p| p.to_string()).collect()
    }

    const RECORD: &str = r#"{"TaggingMetadata":{"ResourceType":"s3Bucket"},"Tags":{"env":"prod"}}"#;

    #[test]
    fn empty_pattern_list_always_passes() {
        assert!(matches_filters(&JaqEvaluator::new(), RECORD, &[]));
    }

    #[test]
    fn literal_true_passes() {
        let p = patterns(&[r#".TaggingMetadata.ResourceType == "s3Bucket""#]);
        assert!(matches_filters(&JaqEvaluator::new(), RECORD, &p));
    }

    #[test]
    fn literal_false_rejects() {
        let p = patterns(&[r#".TaggingMetadata.ResourceType == "ec2Instance""#]);
        assert!(!matches_filters(&JaqEvaluator::new(), RECORD, &p));
    }

    #[test]
    fn truthy_non_boolean_rejects() {
        // jq truthiness is not enough; the result must be the literal `true`.
        let p = patterns(&[".Tags.env"]);
        assert!(!matches_filters(&JaqEvaluator::new(), RECORD, &p));
    }

    #[test]
    fn zero_results_reject() {
        let p = patterns(&[".Tags | empty"]);
        assert!(!matches_filters(&JaqEvaluator::new(), RECORD, &p));
    }

    #[test]
    fn evaluation_error_rejects() {
        let p = patterns(&[".[unclosed"]);
        assert!(!matches_filters(&JaqEvaluator::new(), RECORD, &p));
    }

    #[test]
    fn conjunction_requires_every_pattern() {
        let both = patterns(&[
            r#".TaggingMetadata.ResourceType == "s3Bucket""#,
            r#".Tags.env == "staging""#,
        ]);
        assert!(!matches_filters(&JaqEvaluator::new(), RECORD, &both));

        let passing = patterns(&[
            r#".TaggingMetadata.ResourceType == "s3Bucket""#,
            r#".Tags.env == "prod""#,
        ]);
        assert!(matches_filters(&JaqEvaluator::new(), RECORD, &passing));
    }
}

//! Per-event pipeline orchestration.
//!
//! Every event, whichever source produced it, is carried end-to-end through
//! the same sequence before the next one begins: identity resolution, ARN
//! synthesis, tag extraction, record assembly, filtering, and finally one
//! JSON line on the output stream if the record survived. Failures confined
//! to a single event drop that event and preserve forward progress; only
//! output-stream errors propagate.

use crate::app::arn;
use crate::app::config::ParseConfig;
use crate::app::events::{self, ResourceRef};
use crate::app::filter::matches_filters;
use crate::app::output::{OutputRecord, TaggingMetadata};
use crate::app::query::QueryEvaluator;
use crate::app::tags::extract_tags;
use serde_json::{json, Value};
use std::io::{self, Write};
use tracing::{debug, warn};

fn event_str<'a>(event: &'a Value, path: &str) -> &'a str {
    events::get_json_path(event, path)
        .and_then(Value::as_str)
        .unwrap_or("")
}

/// Carries one event through normalization, ARN synthesis, tag extraction,
/// assembly, and filtering.
pub struct EventPipeline<'a> {
    config: &'a ParseConfig,
    evaluator: &'a dyn QueryEvaluator,
}

impl<'a> EventPipeline<'a> {
    pub fn new(config: &'a ParseConfig, evaluator: &'a dyn QueryEvaluator) -> Self {
        Self { config, evaluator }
    }

    /// Process one raw event body.
    ///
    /// `refs` holds the structured resource entries from the live API
    /// envelope (always empty in archive mode); each valid ref produces its
    /// own record, in ref order. With no valid refs the identity falls back
    /// to the static action-name table. `envelope` is the raw API envelope,
    /// embedded in output records when `includeEvent` is configured.
    pub fn process_event(
        &self,
        body: &Value,
        refs: &[ResourceRef],
        envelope: Option<&Value>,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let valid: Vec<&ResourceRef> = refs.iter().filter(|r| r.is_valid()).collect();

        if valid.is_empty() {
            if let Some(identity) = events::resolve_identity(body, None) {
                self.emit(identity, body, envelope, out)?;
            }
            return Ok(());
        }

        for r in valid {
            let identity = (r.resource_type.clone(), r.resource_name.clone());
            self.emit(identity, body, envelope, out)?;
        }
        Ok(())
    }

    /// ARN synthesis through filtered print for one resolved identity.
    fn emit(
        &self,
        (resource_type, resource_name): (String, String),
        body: &Value,
        envelope: Option<&Value>,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let Some(resource_arn) = arn::map_resource_type_to_arn(&resource_type, &resource_name, body)
        else {
            debug!(%resource_type, "cannot synthesize ARN, dropping event");
            return Ok(());
        };

        let raw_event = body.to_string();
        let tags = match extract_tags(self.evaluator, &raw_event, &self.config.tag_patterns) {
            Ok(tags) => tags,
            Err(err) => {
                warn!(error = %err, "dropping event");
                writeln!(out, "{}", json!({ "error": err.to_string() }))?;
                return Ok(());
            }
        };

        let record = OutputRecord {
            event: if self.config.include_event {
                envelope.cloned()
            } else {
                None
            },
            tagging_metadata: TaggingMetadata {
                resource_name,
                resource_type,
                resource_arn,
                creator_arn: event_str(body, "userIdentity.arn").to_string(),
                creator_name: event_str(body, "userIdentity.userName").to_string(),
            },
            tags,
        };

        let line = match serde_json::to_string(&record) {
            Ok(line) => line,
            Err(err) => {
                warn!(error = %err, "failed to serialize output record");
                writeln!(out, "{}", json!({ "error": err.to_string() }))?;
                return Ok(());
            }
        };

        if matches_filters(self.evaluator, &line, &self.config.filter_patterns) {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}

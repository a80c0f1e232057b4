//! CloudTrail log archive reader.
//!
//! Archives are the `{"Records": [...]}` envelope CloudTrail writes to S3.
//! An unreadable file or unparsable envelope is fatal: archive mode has no
//! later page to recover on. Archive events never carry structured resource
//! refs, so every record takes the action-name table path through the
//! pipeline.

use crate::app::pipeline::EventPipeline;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// The `Records` envelope of an S3 CloudTrail log archive.
#[derive(Debug, Deserialize)]
pub struct TrailLogFile {
    #[serde(rename = "Records")]
    pub records: Vec<Value>,
}

/// Read an archive file and feed every embedded event through the pipeline.
pub fn parse_from_file<P: AsRef<Path>>(
    path: P,
    pipeline: &EventPipeline<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read CloudTrail log file {}", path.display()))?;
    let log_file: TrailLogFile = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse CloudTrail log file {}", path.display()))?;

    info!(
        records = log_file.records.len(),
        file = %path.display(),
        "parsing CloudTrail log archive"
    );

    for record in &log_file.records {
        pipeline.process_event(record, &[], None, out)?;
    }

    Ok(())
}

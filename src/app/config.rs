//! Process configuration.
//!
//! Configuration is a TOML file with camelCase keys, read once at startup and
//! immutable afterwards. Every key is optional; an absent file section simply
//! leaves the default in place.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

fn default_page_size() -> i32 {
    50
}

/// Configuration for the `parse` run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParseConfig {
    /// AWS region for the live CloudTrail client.
    pub region: Option<String>,
    /// RFC3339 window start; preferred over `start_hour` when both are set.
    pub start_time_stamp: Option<String>,
    /// RFC3339 window end; preferred over `end_hour` when both are set.
    pub end_time_stamp: Option<String>,
    /// Window start as an hour offset relative to now (negative = past).
    pub start_hour: Option<i64>,
    /// Window end as an hour offset relative to now.
    pub end_hour: Option<i64>,
    /// CloudTrail resource types to look up, one lookup facet each.
    /// Empty means a single unfiltered lookup.
    pub resource_types: Vec<String>,
    /// Embed the raw event envelope in each output record.
    pub include_event: bool,
    /// jq patterns evaluated against each event to collect tags.
    pub tag_patterns: Vec<String>,
    /// jq patterns evaluated against each assembled record; all must yield
    /// literal `true` for the record to be emitted.
    pub filter_patterns: Vec<String>,
    /// Page size cap for LookupEvents requests (API limit is 50).
    #[serde(default = "default_page_size")]
    pub page_size: i32,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            region: None,
            start_time_stamp: None,
            end_time_stamp: None,
            start_hour: None,
            end_hour: None,
            resource_types: Vec::new(),
            include_event: false,
            tag_patterns: Vec::new(),
            filter_patterns: Vec::new(),
            page_size: default_page_size(),
        }
    }
}

impl ParseConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: ParseConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}

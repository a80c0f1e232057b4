//! Output record assembly.
//!
//! One record is emitted per surviving event, serialized as a single JSON
//! line. The raw event envelope is embedded only when `includeEvent` is
//! configured, so the same type covers both output shapes.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Identity metadata for the resource an event created or affected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaggingMetadata {
    #[serde(rename = "ResourceName")]
    pub resource_name: String,
    #[serde(rename = "ResourceType")]
    pub resource_type: String,
    #[serde(rename = "ResourceARN")]
    pub resource_arn: String,
    #[serde(rename = "CreatorARN")]
    pub creator_arn: String,
    #[serde(rename = "CreatorName")]
    pub creator_name: String,
}

/// The unit of output: one event in, one JSON line out (or nothing, if the
/// event was filtered or unmappable).
///
/// Tags are a `BTreeMap` so serialization is key-ordered and output lines
/// are byte-deterministic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRecord {
    #[serde(rename = "Event", skip_serializing_if = "Option::is_none")]
    pub event: Option<Value>,
    #[serde(rename = "TaggingMetadata")]
    pub tagging_metadata: TaggingMetadata,
    #[serde(rename = "Tags")]
    pub tags: BTreeMap<String, String>,
}

//! Paginated CloudTrail LookupEvents driver.
//!
//! Builds one attribute-filtered lookup facet per configured resource type
//! (or a single unfiltered facet), then follows continuation tokens until
//! each facet is exhausted. Every page is drained through the per-event
//! pipeline in API order before the next page is requested; a page-fetch
//! failure aborts the whole run, since already-printed records cannot be
//! rolled back.

use crate::app::config::ParseConfig;
use crate::app::events::ResourceRef;
use crate::app::pipeline::EventPipeline;
use crate::app::time_window::TimeWindow;
use anyhow::{Context, Result};
use aws_sdk_cloudtrail as cloudtrail;
use cloudtrail::types::{LookupAttribute, LookupAttributeKey};
use serde_json::Value;
use std::io::Write;
use tracing::{debug, info};

pub struct LookupDriver<'a> {
    client: cloudtrail::Client,
    config: &'a ParseConfig,
    pipeline: &'a EventPipeline<'a>,
}

impl<'a> LookupDriver<'a> {
    pub fn new(
        client: cloudtrail::Client,
        config: &'a ParseConfig,
        pipeline: &'a EventPipeline<'a>,
    ) -> Self {
        Self {
            client,
            config,
            pipeline,
        }
    }

    /// Look up all events in the window and print surviving records.
    ///
    /// Facets are processed in configured order; within a facet, pages and
    /// events stay in the order the API returned them.
    pub async fn run(&self, window: &TimeWindow, out: &mut dyn Write) -> Result<()> {
        let facets: Vec<Option<&str>> = if self.config.resource_types.is_empty() {
            vec![None]
        } else {
            self.config
                .resource_types
                .iter()
                .map(|rt| Some(rt.as_str()))
                .collect()
        };

        for facet in facets {
            self.drain_facet(facet, window, out).await?;
        }

        Ok(())
    }

    /// Follow one facet's continuation tokens until exhausted.
    async fn drain_facet(
        &self,
        resource_type: Option<&str>,
        window: &TimeWindow,
        out: &mut dyn Write,
    ) -> Result<()> {
        let mut next_token: Option<String> = None;
        let mut total = 0usize;

        loop {
            let mut request = self
                .client
                .lookup_events()
                .start_time(cloudtrail::primitives::DateTime::from_millis(
                    window.start.timestamp_millis(),
                ))
                .end_time(cloudtrail::primitives::DateTime::from_millis(
                    window.end.timestamp_millis(),
                ))
                .max_results(self.config.page_size);

            if let Some(rt) = resource_type {
                let attr = LookupAttribute::builder()
                    .attribute_key(LookupAttributeKey::ResourceType)
                    .attribute_value(rt)
                    .build()?;
                request = request.lookup_attributes(attr);
            }

            if let Some(token) = next_token.take() {
                request = request.next_token(token);
            }

            let response = request
                .send()
                .await
                .context("CloudTrail LookupEvents request failed")?;

            let events = response.events.unwrap_or_default();
            debug!(
                resource_type = resource_type.unwrap_or("<all>"),
                count = events.len(),
                "retrieved page of CloudTrail events"
            );
            total += events.len();

            for event in &events {
                self.feed_event(event, out)?;
            }

            // An absent or empty token means the facet is drained.
            next_token = response.next_token.filter(|t| !t.is_empty());
            if next_token.is_none() {
                break;
            }
        }

        info!(
            resource_type = resource_type.unwrap_or("<all>"),
            total, "facet exhausted"
        );
        Ok(())
    }

    /// Hand one API event to the pipeline.
    fn feed_event(&self, event: &cloudtrail::types::Event, out: &mut dyn Write) -> Result<()> {
        let Some(raw_body) = event.cloud_trail_event() else {
            debug!(event_id = event.event_id(), "event has no body, skipping");
            return Ok(());
        };
        let body: Value = match serde_json::from_str(raw_body) {
            Ok(body) => body,
            Err(err) => {
                debug!(
                    event_id = event.event_id(),
                    error = %err,
                    "event body is not valid JSON, skipping"
                );
                return Ok(());
            }
        };

        let refs: Vec<ResourceRef> = event
            .resources()
            .iter()
            .map(|r| ResourceRef {
                resource_type: r.resource_type().unwrap_or("").to_string(),
                resource_name: r.resource_name().unwrap_or("").to_string(),
            })
            .collect();

        let envelope = self.config.include_event.then(|| event_to_json(event));
        self.pipeline
            .process_event(&body, &refs, envelope.as_ref(), out)?;
        Ok(())
    }
}

/// Convert a LookupEvents envelope to JSON for embedding in output records.
pub fn event_to_json(event: &cloudtrail::types::Event) -> Value {
    let mut json = serde_json::Map::new();

    if let Some(event_id) = event.event_id() {
        json.insert(
            "EventId".to_string(),
            Value::String(event_id.to_string()),
        );
    }

    if let Some(event_name) = event.event_name() {
        json.insert(
            "EventName".to_string(),
            Value::String(event_name.to_string()),
        );
    }

    if let Some(read_only) = event.read_only() {
        json.insert(
            "ReadOnly".to_string(),
            Value::String(read_only.to_string()),
        );
    }

    if let Some(access_key_id) = event.access_key_id() {
        json.insert(
            "AccessKeyId".to_string(),
            Value::String(access_key_id.to_string()),
        );
    }

    if let Some(event_time) = event.event_time() {
        json.insert(
            "EventTime".to_string(),
            Value::String(event_time.to_string()),
        );
    }

    if let Some(event_source) = event.event_source() {
        json.insert(
            "EventSource".to_string(),
            Value::String(event_source.to_string()),
        );
    }

    if let Some(username) = event.username() {
        json.insert(
            "Username".to_string(),
            Value::String(username.to_string()),
        );
    }

    let resources: Vec<Value> = event
        .resources()
        .iter()
        .map(|r| {
            let mut res_map = serde_json::Map::new();
            if let Some(rt) = r.resource_type() {
                res_map.insert("ResourceType".to_string(), Value::String(rt.to_string()));
            }
            if let Some(rn) = r.resource_name() {
                res_map.insert("ResourceName".to_string(), Value::String(rn.to_string()));
            }
            Value::Object(res_map)
        })
        .collect();
    if !resources.is_empty() {
        json.insert("Resources".to_string(), Value::Array(resources));
    }

    if let Some(raw_body) = event.cloud_trail_event() {
        // Embed the body parsed when possible, verbatim otherwise.
        match serde_json::from_str::<Value>(raw_body) {
            Ok(parsed) => json.insert("CloudTrailEvent".to_string(), parsed),
            Err(_) => json.insert(
                "CloudTrailEvent".to_string(),
                Value::String(raw_body.to_string()),
            ),
        };
    }

    Value::Object(json)
}

//! Trailtag - CloudTrail Event Parser and Resource Tagger
//!
//! Trailtag reads AWS CloudTrail audit events, works out which cloud resource
//! each event created or affected, and prints one JSON record per resource
//! with its canonical ARN, its creator's identity, and a set of tags extracted
//! from the event body with jq patterns.
//!
//! # Event Sources
//!
//! - **Archive mode**: a CloudTrail S3 log archive (`{"Records": [...]}`)
//!   read from disk with `--input-file`
//! - **Live mode**: the CloudTrail `LookupEvents` API, paginated over a
//!   configured time window, one lookup facet per configured resource type
//!
//! # Architecture
//!
//! Both sources feed the same sequential per-event pipeline:
//!
//! - [`app::events`] - resource identity resolution (structured resource refs
//!   with a static event-name table as fallback)
//! - [`app::arn`] - canonical ARN synthesis per resource type
//! - [`app::tags`] - tag extraction by evaluating configured jq patterns
//!   against the raw event
//! - [`app::output`] - output record assembly and serialization
//! - [`app::filter`] - conjunctive jq filter chain deciding emission
//!
//! Records are printed to stdout as newline-delimited JSON, in the order the
//! events were observed. Diagnostics go to stderr via `tracing`.

pub mod app;

//! Core modules for Trailtag.
//!
//! # Module Organization
//!
//! ## Event Sources
//! - [`archive`] - CloudTrail S3 log archive reader
//! - [`lookup`] - paginated CloudTrail LookupEvents driver
//!
//! ## Pipeline
//! - [`events`] - resource identity resolution for raw events
//! - [`arn`] - canonical ARN synthesis
//! - [`tags`] - jq-based tag extraction
//! - [`filter`] - jq-based boolean filter chain
//! - [`output`] - output record assembly
//! - [`pipeline`] - per-event orchestration of the stages above
//!
//! ## Infrastructure
//! - [`config`] - TOML configuration
//! - [`query`] - jq pattern evaluation seam
//! - [`time_window`] - lookup time window resolution

pub mod archive;
pub mod arn;
pub mod config;
pub mod events;
pub mod filter;
pub mod lookup;
pub mod output;
pub mod pipeline;
pub mod query;
pub mod tags;
pub mod time_window;

pub use config::ParseConfig;
pub use pipeline::EventPipeline;

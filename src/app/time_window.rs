//! Lookup time window resolution.
//!
//! Live lookups are bounded by a `[start, end)` window taken from
//! configuration, either as a pair of RFC3339 timestamps or as a pair of hour
//! offsets relative to now. A window that fails to resolve is reported as an
//! inline `{"error": ...}` line and the caller performs no lookups at all.

use crate::app::config::ParseConfig;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use std::io::{self, Write};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TimeWindowError {
    #[error("{field} parse error: {source}")]
    TimeFormat {
        field: &'static str,
        source: chrono::ParseError,
    },
    #[error("{start_field} ({start}) is at or after {end_field} ({end})")]
    TimeOrder {
        start_field: &'static str,
        end_field: &'static str,
        start: String,
        end: String,
    },
}

/// A validated `[start, end)` instant pair. `start < end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Build a window from two RFC3339 timestamp strings.
    pub fn from_timestamps(start: &str, end: &str) -> Result<Self, TimeWindowError> {
        let start_time = DateTime::parse_from_rfc3339(start)
            .map_err(|source| TimeWindowError::TimeFormat {
                field: "startTimeStamp",
                source,
            })?
            .with_timezone(&Utc);
        let end_time = DateTime::parse_from_rfc3339(end)
            .map_err(|source| TimeWindowError::TimeFormat {
                field: "endTimeStamp",
                source,
            })?
            .with_timezone(&Utc);

        if start_time >= end_time {
            return Err(TimeWindowError::TimeOrder {
                start_field: "startTimeStamp",
                end_field: "endTimeStamp",
                start: start_time.to_rfc3339(),
                end: end_time.to_rfc3339(),
            });
        }

        Ok(Self {
            start: start_time,
            end: end_time,
        })
    }

    /// Build a window from hour offsets relative to now (negative = past).
    pub fn from_hour_range(start: i64, end: i64) -> Result<Self, TimeWindowError> {
        if start >= end {
            return Err(TimeWindowError::TimeOrder {
                start_field: "startHour",
                end_field: "endHour",
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        let now = Utc::now();
        Ok(Self {
            start: now + Duration::hours(start),
            end: now + Duration::hours(end),
        })
    }

    /// Resolve the window from configuration, preferring the timestamp form.
    ///
    /// Resolution errors are printed to `out` as a single-line JSON error
    /// object and yield `None`; the caller must then skip live lookup
    /// entirely. Neither form configured also yields `None`, silently.
    pub fn resolve(config: &ParseConfig, out: &mut dyn Write) -> io::Result<Option<Self>> {
        let result = match (
            &config.start_time_stamp,
            &config.end_time_stamp,
            config.start_hour,
            config.end_hour,
        ) {
            (Some(start), Some(end), _, _) => Self::from_timestamps(start, end),
            (_, _, Some(start), Some(end)) => Self::from_hour_range(start, end),
            _ => {
                debug!("no time window configured, skipping live lookup");
                return Ok(None);
            }
        };

        match result {
            Ok(window) => Ok(Some(window)),
            Err(err) => {
                writeln!(out, "{}", json!({ "error": err.to_string() }))?;
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_must_be_ordered() {
        let err = TimeWindow::from_timestamps("2024-01-02T00:00:00Z", "2024-01-01T00:00:00Z")
            .unwrap_err();
        assert!(matches!(err, TimeWindowError::TimeOrder { .. }));
    }

    #[test]
    fn equal_timestamps_are_rejected() {
        let err = TimeWindow::from_timestamps("2024-01-01T00:00:00Z", "2024-01-01T00:00:00Z")
            .unwrap_err();
        assert!(matches!(err, TimeWindowError::TimeOrder { .. }));
    }

    #[test]
    fn bad_timestamp_is_a_format_error() {
        let err = TimeWindow::from_timestamps("yesterday", "2024-01-01T00:00:00Z").unwrap_err();
        assert!(matches!(
            err,
            TimeWindowError::TimeFormat {
                field: "startTimeStamp",
                ..
            }
        ));
    }

    #[test]
    fn valid_timestamps_resolve() {
        let window =
            TimeWindow::from_timestamps("2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z").unwrap();
        assert_eq!(window.end - window.start, Duration::hours(24));
    }

    #[test]
    fn hour_range_must_be_ordered() {
        let err = TimeWindow::from_hour_range(0, -8).unwrap_err();
        assert!(matches!(err, TimeWindowError::TimeOrder { .. }));
        let err = TimeWindow::from_hour_range(-8, -8).unwrap_err();
        assert!(matches!(err, TimeWindowError::TimeOrder { .. }));
    }

    #[test]
    fn hour_range_spans_the_offset() {
        let window = TimeWindow::from_hour_range(-8, 0).unwrap();
        assert_eq!(window.end - window.start, Duration::hours(8));
    }

    #[test]
    fn resolve_prefers_timestamps_over_hours() {
        let config = ParseConfig {
            start_time_stamp: Some("2024-01-01T00:00:00Z".to_string()),
            end_time_stamp: Some("2024-01-01T06:00:00Z".to_string()),
            start_hour: Some(-48),
            end_hour: Some(0),
            ..ParseConfig::default()
        };
        let mut out = Vec::new();
        let window = TimeWindow::resolve(&config, &mut out).unwrap().unwrap();
        assert_eq!(window.end - window.start, Duration::hours(6));
        assert!(out.is_empty());
    }

    #[test]
    fn resolve_without_a_configured_window_is_silent() {
        let mut out = Vec::new();
        let window = TimeWindow::resolve(&ParseConfig::default(), &mut out).unwrap();
        assert!(window.is_none());
        assert!(out.is_empty());
    }

    #[test]
    fn resolve_reports_errors_as_json_lines() {
        let config = ParseConfig {
            start_hour: Some(0),
            end_hour: Some(-8),
            ..ParseConfig::default()
        };
        let mut out = Vec::new();
        let window = TimeWindow::resolve(&config, &mut out).unwrap();
        assert!(window.is_none());

        let line = String::from_utf8(out).unwrap();
        let diagnostic: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
        assert!(diagnostic["error"]
            .as_str()
            .unwrap()
            .contains("startHour (0) is at or after endHour (-8)"));
    }
}

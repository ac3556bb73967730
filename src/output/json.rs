//! JSON output formatting
//!
//! Machine-readable summary of a run: where and when it ran, the configuration
//! it used, and the total elapsed time. Printed after the text output when
//! `--json` is given.

use crate::config::Config;
use crate::stats::RunStats;
use crate::Result;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Duration with both microseconds and human-readable format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonDuration {
    pub micros: u64,
    pub seconds: f64,
    pub human: String,
}

impl JsonDuration {
    pub fn from_duration(d: Duration) -> Self {
        Self {
            micros: d.as_micros() as u64,
            seconds: d.as_secs_f64(),
            human: format_duration_human(d),
        }
    }
}

/// Run information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRunInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub version: String,
}

/// Complete JSON run summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRunSummary {
    pub run_info: JsonRunInfo,
    pub config: Config,
    pub workers: usize,
    pub total_duration: JsonDuration,
}

/// Build the JSON summary for a finished run
pub fn build_run_summary(
    config: &Config,
    stats: &RunStats,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> JsonRunSummary {
    let hostname = hostname::get()
        .ok()
        .map(|h| h.to_string_lossy().into_owned());

    JsonRunSummary {
        run_info: JsonRunInfo {
            hostname,
            start_time: start_time.to_rfc3339(),
            end_time: end_time.to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        config: config.clone(),
        workers: stats.workers,
        total_duration: JsonDuration::from_duration(stats.elapsed),
    }
}

/// Serialize a summary as pretty-printed JSON
pub fn to_json_string(summary: &JsonRunSummary) -> Result<String> {
    serde_json::to_string_pretty(summary).context("Failed to serialize run summary")
}

/// Format duration in human-readable format
fn format_duration_human(d: Duration) -> String {
    let micros = d.as_micros() as u64;

    if micros == 0 {
        return "0µs".to_string();
    }

    if micros < 1000 {
        format!("{}µs", micros)
    } else if micros < 1_000_000 {
        format!("{:.3}ms", micros as f64 / 1000.0)
    } else if micros < 60_000_000 {
        format!("{:.3}s", micros as f64 / 1_000_000.0)
    } else if micros < 3_600_000_000 {
        format!("{:.2}m", micros as f64 / 60_000_000.0)
    } else {
        format!("{:.2}h", micros as f64 / 3_600_000_000.0)
    }
}

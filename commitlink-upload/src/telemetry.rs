//! In-memory run counters with a single best-effort flush.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::FlushError;
use crate::ports::MetricsTransport;

/// Prefix applied to every counter when it is flushed.
pub const METRIC_PREFIX: &str = "commitlink.git_metadata.";

pub const SCI_SUCCESS: &str = "sci.success";
pub const SCI_FAILED: &str = "sci.failed";
pub const SCI_RETRIES: &str = "sci.retries";
pub const GITDB_SUCCESS: &str = "gitdb.success";

/// One flushed counter, in the collector's series format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub metric: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// `(unix seconds, value)` pairs.
    pub points: Vec<(i64, u64)>,
    pub tags: Vec<String>,
}

/// Counters accumulated by one run.
#[derive(Debug, Clone, Default)]
pub struct Telemetry {
    tags: Vec<String>,
    counters: BTreeMap<&'static str, u64>,
}

impl Telemetry {
    /// Telemetry tagged with the reporting binary's version.
    pub fn for_version(cli_version: &str) -> Self {
        Self {
            tags: vec![format!("cli_version:{cli_version}")],
            counters: BTreeMap::new(),
        }
    }

    pub fn increment(&mut self, name: &'static str, delta: u64) {
        *self.counters.entry(name).or_insert(0) += delta;
    }

    /// Current value, 0 if never incremented.
    pub fn get(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn counters(&self) -> &BTreeMap<&'static str, u64> {
        &self.counters
    }

    pub fn series(&self, at: DateTime<Utc>) -> Vec<Series> {
        let ts = at.timestamp();
        self.counters
            .iter()
            .map(|(name, value)| Series {
                metric: format!("{METRIC_PREFIX}{name}"),
                kind: "count",
                points: vec![(ts, *value)],
                tags: self.tags.clone(),
            })
            .collect()
    }

    /// Send all counters. Nothing is sent when no counter was recorded.
    pub fn flush(&self, transport: &dyn MetricsTransport) -> Result<(), FlushError> {
        if self.counters.is_empty() {
            tracing::debug!("no metrics to flush");
            return Ok(());
        }
        let series = self.series(Utc::now());
        transport.submit(&series)?;
        tracing::debug!("flushed {} metrics", series.len());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

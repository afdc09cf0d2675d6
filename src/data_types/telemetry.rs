use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_derive::Deserialize;

use crate::errors::{SyncError, SyncResult};

pub const HEART_RATE: &str = "Heart Rate";
pub const CADENCE: &str = "Cadence";
pub const SPEED: &str = "Speed";
pub const OUTPUT: &str = "Output";

/// Metrics every ride must carry to be turned into a workout file.
pub const MANDATORY_METRICS: [&str; 4] = [HEART_RATE, CADENCE, SPEED, OUTPUT];

/// A named slice of a ride, in seconds relative to pedaling start.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Segment {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "start_time_offset")]
    pub start_offset: i64,

    pub length: i64,
}

/// Per-tick samples of one ride, validated so every metric lines up with the ticks.
#[derive(Debug, Clone)]
pub struct TelemetrySeries {
    start: DateTime<Utc>,
    ticks: Vec<i64>,
    metrics: BTreeMap<String, Vec<f64>>,
}

impl TelemetrySeries {
    /// Only reachable through the normalizer, which enforces the shape invariants.
    pub(crate) fn new(
        start: DateTime<Utc>,
        ticks: Vec<i64>,
        metrics: BTreeMap<String, Vec<f64>>,
    ) -> Self {
        Self {
            start,
            ticks,
            metrics,
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn ticks(&self) -> &[i64] {
        &self.ticks
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn metric_names(&self) -> impl Iterator<Item = &str> {
        self.metrics.keys().map(String::as_str)
    }

    pub fn tick(&self, index: usize) -> SyncResult<i64> {
        self.ticks.get(index).copied().ok_or_else(|| {
            SyncError::data_shape(format!(
                "tick {} requested but only {} ticks recorded",
                index,
                self.ticks.len()
            ))
        })
    }

    pub fn value(&self, metric: &str, index: usize) -> SyncResult<f64> {
        let values = self
            .metrics
            .get(metric)
            .ok_or_else(|| SyncError::data_shape(format!("missing metric '{}'", metric)))?;

        values.get(index).copied().ok_or_else(|| {
            SyncError::data_shape(format!(
                "no '{}' sample at tick {} ({} recorded)",
                metric,
                index,
                values.len()
            ))
        })
    }
}

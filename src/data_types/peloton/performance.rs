use serde_derive::Deserialize;

use crate::{
    data_types::telemetry::Segment,
    errors::{SyncError, SyncResult},
};

pub const CALORIES_SUMMARY: &str = "Calories";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Metric {
    #[serde(rename = "display_name")]
    pub name: String,
    #[serde(rename = "display_unit", default)]
    pub unit: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Summary {
    #[serde(rename = "display_name")]
    pub name: String,
    #[serde(rename = "display_unit", default)]
    pub unit: String,
    pub value: f64,
}

/// Peloton's per-second performance graph for one workout.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PerformanceGraph {
    #[serde(default)]
    pub duration: i64,

    #[serde(rename = "seconds_since_pedaling_start")]
    pub ticks: Vec<i64>,

    pub metrics: Vec<Metric>,

    #[serde(rename = "segment_list", default)]
    pub segments: Vec<Segment>,

    #[serde(default)]
    pub summaries: Vec<Summary>,
}

impl PerformanceGraph {
    pub fn total_calories(&self) -> SyncResult<f64> {
        self.summaries
            .iter()
            .find(|summary| summary.name == CALORIES_SUMMARY)
            .map(|summary| summary.value)
            .ok_or_else(|| SyncError::data_shape("performance graph has no Calories summary"))
    }
}

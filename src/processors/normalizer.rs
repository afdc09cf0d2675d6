use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::{
    data_types::{
        peloton::performance::PerformanceGraph,
        telemetry::{TelemetrySeries, MANDATORY_METRICS},
    },
    errors::{SyncError, SyncResult},
    logvbln,
};

pub struct TelemetryNormalizer;

impl TelemetryNormalizer {
    const CC: &'static str = "Normalizer";

    /// Pairs every metric with the tick sequence, rejecting any metric whose samples do not
    /// line up one-to-one with the ticks.
    pub fn normalize<I>(
        ticks: Vec<i64>,
        metrics: I,
        start: DateTime<Utc>,
    ) -> SyncResult<TelemetrySeries>
    where
        I: IntoIterator<Item = (String, Vec<f64>)>,
    {
        if let Some(pair) = ticks.windows(2).find(|pair| pair[1] <= pair[0]) {
            return Err(SyncError::data_shape(format!(
                "ticks must strictly increase, got {} after {}",
                pair[1], pair[0]
            )));
        }

        let mut by_name: BTreeMap<String, Vec<f64>> = BTreeMap::new();

        for (name, values) in metrics {
            if values.len() != ticks.len() {
                return Err(SyncError::data_shape(format!(
                    "metric '{}' has {} samples for {} ticks",
                    name,
                    values.len(),
                    ticks.len()
                )));
            }

            if by_name.contains_key(&name) {
                return Err(SyncError::data_shape(format!(
                    "metric '{}' reported twice",
                    name
                )));
            }

            by_name.insert(name, values);
        }

        if let Some(missing) = MANDATORY_METRICS
            .iter()
            .find(|name| !by_name.contains_key(**name))
        {
            return Err(SyncError::data_shape(format!(
                "mandatory metric '{}' is missing",
                missing
            )));
        }

        logvbln!(
            "{} ticks, metrics: {:?}",
            ticks.len(),
            by_name.keys().collect::<Vec<_>>()
        );

        Ok(TelemetrySeries::new(start, ticks, by_name))
    }

    pub fn from_performance_graph(
        graph: &PerformanceGraph,
        start: DateTime<Utc>,
    ) -> SyncResult<TelemetrySeries> {
        TelemetryNormalizer::normalize(
            graph.ticks.clone(),
            graph
                .metrics
                .iter()
                .map(|metric| (metric.name.clone(), metric.values.clone())),
            start,
        )
    }
}

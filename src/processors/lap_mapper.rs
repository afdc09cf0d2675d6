use chrono::Duration;

use crate::{
    data_types::{
        telemetry::{Segment, TelemetrySeries, CADENCE, HEART_RATE, OUTPUT, SPEED},
        units::{Miles, MilesPerHour},
        workout::{Lap, Trackpoint},
    },
    errors::{SyncError, SyncResult},
    logvbln,
};

/// Maps a segment offset (seconds since pedaling start) to the tick recorded at that second.
///
/// Assumes exactly one tick per second, which Peloton does not strictly guarantee.
pub fn segment_offset_to_tick_index(offset_seconds: i64) -> SyncResult<usize> {
    usize::try_from(offset_seconds).map_err(|_| {
        SyncError::data_shape(format!("negative segment offset {}", offset_seconds))
    })
}

pub struct LapMapper<'a> {
    series: &'a TelemetrySeries,
    total_ride_seconds: i64,
    total_calories: f64,
    cumulative_distance: Miles,
}

impl<'a> LapMapper<'a> {
    const CC: &'static str = "LapMapper";

    pub fn new(series: &'a TelemetrySeries, total_ride_seconds: i64, total_calories: f64) -> Self {
        Self {
            series,
            total_ride_seconds,
            total_calories,
            cumulative_distance: Miles(0.0),
        }
    }

    /// Turns the ride's segments into laps, in ascending start order.
    pub fn map_laps(mut self, segments: &[Segment]) -> SyncResult<Vec<Lap>> {
        if self.total_ride_seconds <= 0 {
            return Err(SyncError::data_shape(format!(
                "ride duration must be positive, got {}s",
                self.total_ride_seconds
            )));
        }

        let mut ordered: Vec<&Segment> = segments.iter().collect();
        ordered.sort_by_key(|segment| segment.start_offset);

        let mut laps = Vec::with_capacity(ordered.len());
        for segment in ordered {
            laps.push(self.map_segment(segment)?);
        }

        logvbln!(
            "{} laps, {:.3} miles in total",
            laps.len(),
            self.cumulative_distance.0
        );

        Ok(laps)
    }

    fn map_segment(&mut self, segment: &Segment) -> SyncResult<Lap> {
        if segment.length <= 0 {
            return Err(SyncError::data_shape(format!(
                "segment '{}' has non-positive length {}",
                segment.name, segment.length
            )));
        }

        let last_index = self
            .series
            .len()
            .checked_sub(1)
            .ok_or_else(|| SyncError::data_shape("telemetry has no ticks"))?;

        let start_tick = segment_offset_to_tick_index(segment.start_offset)?;
        if start_tick > last_index {
            return Err(SyncError::data_shape(format!(
                "segment '{}' starts at tick {} but the last tick is {}",
                segment.name, start_tick, last_index
            )));
        }
        let end_tick = (start_tick + segment.length as usize - 1).min(last_index);

        let mut trackpoints = Vec::with_capacity(end_tick - start_tick + 2);

        if start_tick == 0 {
            // Garmin only starts counting moving time once it has seen a second sample, so the
            // ride gets an extra point at its very start carrying the first tick's readings.
            let mut first = self.trackpoint_at(0, Miles(0.0))?;
            first.time = self.series.start();
            trackpoints.push(first);
        }

        for index in start_tick..=end_tick {
            let previous_tick = if index > 0 {
                self.series.tick(index - 1)?
            } else {
                0
            };
            let elapsed = (self.series.tick(index)? - previous_tick) as f64;
            let speed = MilesPerHour(self.series.value(SPEED, index)?);

            self.cumulative_distance = self.cumulative_distance + speed.distance_over(elapsed);
            trackpoints.push(self.trackpoint_at(index, self.cumulative_distance)?);
        }

        let start_seconds = self.series.tick(start_tick)?;
        let total_seconds = self.series.tick(end_tick)? - start_seconds + 1;

        // Linear share of the ride's calories, truncated per lap.
        let calories =
            (self.total_calories * total_seconds as f64 / self.total_ride_seconds as f64).floor()
                as i32;

        Ok(Lap {
            start: self.series.start() + Duration::seconds(start_seconds),
            total_seconds,
            calories,
            trackpoints,
        })
    }

    fn trackpoint_at(&self, index: usize, distance: Miles) -> SyncResult<Trackpoint> {
        Ok(Trackpoint {
            time: self.series.start() + Duration::seconds(self.series.tick(index)?),
            heart_rate: self.series.value(HEART_RATE, index)? as i32,
            cadence: self.series.value(CADENCE, index)? as i32,
            speed: MilesPerHour(self.series.value(SPEED, index)?),
            power: self.series.value(OUTPUT, index)?,
            distance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::normalizer::TelemetryNormalizer;
    use approx::assert_relative_eq;
    use chrono::{DateTime, TimeZone, Utc};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 3, 1, 12, 0, 0).unwrap()
    }

    fn series(ticks: Vec<i64>, speeds: Vec<f64>) -> TelemetrySeries {
        let len = ticks.len();
        let heart_rate: Vec<f64> = (0..len).map(|i| 120.0 + i as f64 + 0.7).collect();
        TelemetryNormalizer::normalize(
            ticks,
            vec![
                (HEART_RATE.to_string(), heart_rate),
                (CADENCE.to_string(), vec![85.0; len]),
                (SPEED.to_string(), speeds),
                (OUTPUT.to_string(), vec![180.5; len]),
            ],
            start(),
        )
        .unwrap()
    }

    fn segment(start_offset: i64, length: i64) -> Segment {
        Segment {
            name: format!("segment@{}", start_offset),
            start_offset,
            length,
        }
    }

    #[test]
    fn tick_zero_segment_starts_with_synthesized_point() {
        let series = series(vec![1, 2, 3, 4], vec![18.0; 4]);

        let laps = LapMapper::new(&series, 4, 40.0)
            .map_laps(&[segment(0, 4)])
            .unwrap();

        let first = &laps[0].trackpoints[0];
        assert_eq!(first.time, start());
        assert_eq!(first.distance, Miles(0.0));
        assert_eq!(first.heart_rate, 120);
        assert_eq!(laps[0].trackpoints.len(), 5);
        assert_eq!(laps[0].start, start() + Duration::seconds(1));
    }

    #[test]
    fn later_segments_have_no_synthesized_point() {
        let series = series(vec![1, 2, 3, 4], vec![18.0; 4]);

        let laps = LapMapper::new(&series, 4, 40.0)
            .map_laps(&[segment(2, 2), segment(0, 2)])
            .unwrap();

        assert_eq!(laps.len(), 2);
        assert_eq!(laps[0].trackpoints.len(), 3);
        assert_eq!(laps[1].trackpoints.len(), 2);
        assert_eq!(laps[1].trackpoints[0].time, start() + Duration::seconds(3));
    }

    #[test]
    fn distance_accumulates_across_laps() {
        let speeds = vec![36.0, 18.0, 0.0, 72.0, 36.0];
        let series = series(vec![1, 2, 3, 5, 6], speeds.clone());

        let laps = LapMapper::new(&series, 6, 60.0)
            .map_laps(&[segment(0, 2), segment(2, 3)])
            .unwrap();

        let distances: Vec<f64> = laps
            .iter()
            .flat_map(|lap| lap.trackpoints.iter().map(|tp| tp.distance.0))
            .collect();
        assert!(distances.windows(2).all(|pair| pair[0] <= pair[1]));

        // Elapsed seconds per tick: 1, 1, 1, 2, 1.
        let expected: f64 = [(36.0, 1.0), (18.0, 1.0), (0.0, 1.0), (72.0, 2.0), (36.0, 1.0)]
            .iter()
            .map(|(speed, seconds)| speed * seconds / 3600.0)
            .sum();
        assert_relative_eq!(*distances.last().unwrap(), expected);
        assert_relative_eq!(laps[1].trackpoints[0].distance.0, 0.015);
    }

    #[test]
    fn segment_end_is_clamped_to_last_tick() {
        let series = series(vec![1, 2, 3], vec![18.0; 3]);

        let laps = LapMapper::new(&series, 10, 100.0)
            .map_laps(&[segment(1, 30)])
            .unwrap();

        assert_eq!(laps[0].trackpoints.len(), 2);
        assert_eq!(laps[0].total_seconds, 2);
    }

    #[test]
    fn lap_duration_counts_both_end_ticks() {
        let series = series(vec![3, 4, 5, 6, 7, 8], vec![18.0; 6]);

        let laps = LapMapper::new(&series, 600, 100.0)
            .map_laps(&[segment(1, 4)])
            .unwrap();

        // tick[4] - tick[1] + 1
        assert_eq!(laps[0].total_seconds, 4);
        assert_eq!(laps[0].start, start() + Duration::seconds(4));
    }

    #[test]
    fn calorie_shares_are_truncated_per_lap() {
        let series = series((1..=10).collect(), vec![18.0; 10]);

        let laps = LapMapper::new(&series, 10, 100.0)
            .map_laps(&[segment(0, 3), segment(3, 3), segment(6, 4)])
            .unwrap();

        let shares: Vec<i32> = laps.iter().map(|lap| lap.calories).collect();
        assert_eq!(shares, vec![30, 30, 40]);

        let uneven = LapMapper::new(&series, 10, 101.0)
            .map_laps(&[segment(0, 3), segment(3, 3), segment(6, 4)])
            .unwrap();
        let shares: Vec<i32> = uneven.iter().map(|lap| lap.calories).collect();
        let total: i32 = shares.iter().sum();
        assert_eq!(shares, vec![30, 30, 40]);
        assert!(total <= 101);
        assert!(101 - total < uneven.len() as i32);
    }

    #[test]
    fn segment_past_the_telemetry_is_rejected() {
        let series = series(vec![1, 2, 3], vec![18.0; 3]);

        let result = LapMapper::new(&series, 3, 30.0).map_laps(&[segment(3, 5)]);

        assert!(matches!(result, Err(SyncError::DataShape(_))));
    }

    #[test]
    fn zero_length_segment_is_rejected() {
        let series = series(vec![1, 2, 3], vec![18.0; 3]);

        assert!(LapMapper::new(&series, 3, 30.0)
            .map_laps(&[segment(1, 0)])
            .is_err());
    }

    #[test]
    fn ride_duration_must_be_positive() {
        let series = series(vec![1, 2, 3], vec![18.0; 3]);

        assert!(LapMapper::new(&series, 0, 30.0)
            .map_laps(&[segment(0, 3)])
            .is_err());
    }

    #[test]
    fn offsets_map_straight_to_indexes() {
        assert_eq!(segment_offset_to_tick_index(42).unwrap(), 42);
        assert!(segment_offset_to_tick_index(-1).is_err());
    }
}

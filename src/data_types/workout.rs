use chrono::{DateTime, Utc};

use super::units::{Miles, MilesPerHour};

#[derive(Debug, Clone, PartialEq)]
pub struct Trackpoint {
    pub time: DateTime<Utc>,
    pub heart_rate: i32,
    pub cadence: i32,
    pub speed: MilesPerHour,
    pub power: f64,
    /// Cumulative over the whole ride, never reset per lap.
    pub distance: Miles,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lap {
    pub start: DateTime<Utc>,
    pub total_seconds: i64,
    pub calories: i32,
    pub trackpoints: Vec<Trackpoint>,
}

/// A rendered Training Center (TCX) document ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Tcx {
    pub start: DateTime<Utc>,
    pub content: String,
}

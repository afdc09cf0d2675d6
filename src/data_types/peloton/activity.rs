use chrono::{DateTime, Utc};
use serde_derive::Deserialize;

use crate::data_types::common::Timestamped;

pub const FITNESS_DISCIPLINE_CYCLING: &str = "cycling";

pub type ActivityId = String;
pub type RideId = String;

/// The class a workout was taken against, as joined into the workouts listing.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RidePointer {
    pub id: RideId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration: i64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Workout {
    pub id: ActivityId,

    /// Epoch seconds, used for the gear and record date.
    pub created: i64,

    #[serde(with = "chrono::serde::ts_seconds")]
    pub start_time: DateTime<Utc>,

    pub fitness_discipline: String,

    #[serde(default)]
    pub ride: Option<RidePointer>,
}

impl Workout {
    pub fn is_cycling(&self) -> bool {
        self.fitness_discipline == FITNESS_DISCIPLINE_CYCLING
    }

    pub fn link(&self) -> String {
        format!("https://members.onepeloton.com/profile/workouts/{}", self.id)
    }
}

impl Timestamped for Workout {
    fn start_instant(&self) -> DateTime<Utc> {
        self.start_time
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WorkoutPage {
    pub data: Vec<Workout>,
    pub page_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workouts_listing_page_deserializes() {
        let page: WorkoutPage = serde_json::from_value(serde_json::json!({
            "total": 2,
            "count": 2,
            "limit": 100,
            "page": 0,
            "page_count": 1,
            "data": [
                {
                    "id": "abc123",
                    "created": 1614600000,
                    "start_time": 1614600060,
                    "fitness_discipline": "cycling",
                    "ride": {
                        "id": "ride-1",
                        "title": "30 min Climb Ride",
                        "description": "Hills.",
                        "duration": 1800
                    }
                },
                {
                    "id": "def456",
                    "created": 1614500000,
                    "start_time": 1614500000,
                    "fitness_discipline": "strength",
                    "ride": null
                }
            ]
        }))
        .unwrap();

        assert_eq!(page.page_count, 1);
        assert!(page.data[0].is_cycling());
        assert_eq!(page.data[0].start_instant().timestamp(), 1614600060);
        assert_eq!(page.data[0].ride.as_ref().unwrap().duration, 1800);
        assert!(!page.data[1].is_cycling());
        assert!(page.data[1].ride.is_none());
        assert_eq!(
            page.data[0].link(),
            "https://members.onepeloton.com/profile/workouts/abc123"
        );
    }
}

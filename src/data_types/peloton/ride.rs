use serde_derive::Deserialize;

use super::activity::RideId;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Instructor {
    pub name: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RideDescription {
    pub id: RideId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Length of the class in seconds.
    pub duration: i64,
    #[serde(default)]
    pub instructor: Option<Instructor>,
}

impl RideDescription {
    pub fn title_with_instructor(&self) -> String {
        match &self.instructor {
            Some(instructor) => format!("{} with {}", self.title, instructor.name),
            None => self.title.clone(),
        }
    }

    /// Free text placed in the workout file notes.
    pub fn notes(&self) -> String {
        format!("{}\n{}", self.title_with_instructor(), self.description)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RideDetail {
    pub ride: RideDescription,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_names_the_instructor() {
        let detail: RideDetail = serde_json::from_value(serde_json::json!({
            "ride": {
                "id": "ride-1",
                "title": "45 min Power Zone Ride",
                "description": "Zones 2 through 5.",
                "duration": 2700,
                "instructor": { "name": "Matt Wilpers" }
            },
            "segments": { "segment_list": [] }
        }))
        .unwrap();

        assert_eq!(
            detail.ride.title_with_instructor(),
            "45 min Power Zone Ride with Matt Wilpers"
        );
        assert_eq!(
            detail.ride.notes(),
            "45 min Power Zone Ride with Matt Wilpers\nZones 2 through 5."
        );
    }

    #[test]
    fn missing_instructor_keeps_plain_title() {
        let detail: RideDetail = serde_json::from_value(serde_json::json!({
            "ride": { "id": "ride-2", "title": "Just Ride", "duration": 1200 }
        }))
        .unwrap();

        assert_eq!(detail.ride.title_with_instructor(), "Just Ride");
    }
}

use chrono::{DateTime, Utc};
use serde_derive::Deserialize;

use crate::{data_types::common::Timestamped, util::deserialize_garmin_gmt};

pub type GarminActivityId = i64;

pub fn activity_link(activity_id: GarminActivityId) -> String {
    format!("https://connect.garmin.com/modern/activity/{}", activity_id)
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GarminActivity {
    pub activity_id: GarminActivityId,
    #[serde(default)]
    pub activity_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub owner_id: i64,
    #[serde(default)]
    pub start_time_local: String,
    #[serde(rename = "startTimeGMT", deserialize_with = "deserialize_garmin_gmt")]
    pub start_time_gmt: DateTime<Utc>,
}

impl Timestamped for GarminActivity {
    fn start_instant(&self) -> DateTime<Utc> {
        self.start_time_gmt
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSuccess {
    #[serde(rename = "internalId")]
    pub activity_id: GarminActivityId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedImportResult {
    #[serde(default)]
    pub successes: Vec<UploadSuccess>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub detailed_import_result: DetailedImportResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn search_results_parse_gmt_start() {
        let activities: Vec<GarminActivity> = serde_json::from_value(serde_json::json!([
            {
                "activityId": 6_411_234_567_i64,
                "activityName": "Indoor Cycling",
                "description": null,
                "ownerId": 1234,
                "startTimeLocal": "2021-03-01 07:30:00",
                "startTimeGMT": "2021-03-01 12:30:00"
            }
        ]))
        .unwrap();

        assert_eq!(
            activities[0].start_instant(),
            Utc.with_ymd_and_hms(2021, 3, 1, 12, 30, 0).unwrap()
        );
        assert_eq!(activities[0].description, None);
        assert_eq!(
            activity_link(activities[0].activity_id),
            "https://connect.garmin.com/modern/activity/6411234567"
        );
    }

    #[test]
    fn upload_response_lists_created_activity() {
        let response: UploadResponse = serde_json::from_value(serde_json::json!({
            "detailedImportResult": {
                "uploadId": 112233,
                "successes": [ { "internalId": 6_411_234_567_i64, "externalId": null } ],
                "failures": []
            }
        }))
        .unwrap();

        assert_eq!(response.detailed_import_result.successes.len(), 1);
        assert_eq!(
            response.detailed_import_result.successes[0].activity_id,
            6_411_234_567
        );
    }
}

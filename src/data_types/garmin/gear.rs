use serde_derive::{Deserialize, Serialize};

pub type GearId = String;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Gear {
    #[serde(rename = "displayName", default)]
    pub name: Option<String>,
    #[serde(default)]
    pub custom_make_model: String,
    #[serde(rename = "uuid")]
    pub gear_id: GearId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileLocation {
    pub user_profile_id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTitleUpdate<'a> {
    pub activity_id: i64,
    pub activity_name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDescriptionUpdate<'a> {
    pub activity_id: i64,
    pub description: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gear_listing_deserializes() {
        let gear: Vec<Gear> = serde_json::from_value(serde_json::json!([
            { "displayName": null, "customMakeModel": "Peloton", "uuid": "a1b2", "gearStatusName": "active" }
        ]))
        .unwrap();

        assert_eq!(gear[0].custom_make_model, "Peloton");
        assert_eq!(gear[0].gear_id, "a1b2");
    }

    #[test]
    fn metadata_updates_use_garmin_field_names() {
        let title = serde_json::to_value(ActivityTitleUpdate {
            activity_id: 7,
            activity_name: "Climb",
        })
        .unwrap();
        let description = serde_json::to_value(ActivityDescriptionUpdate {
            activity_id: 7,
            description: "Hills",
        })
        .unwrap();

        assert_eq!(title, serde_json::json!({ "activityId": 7, "activityName": "Climb" }));
        assert_eq!(description, serde_json::json!({ "activityId": 7, "description": "Hills" }));
    }
}

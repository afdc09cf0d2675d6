use chrono::NaiveDate;
use serde_json::Value;

use crate::{
    client::{Endpoint, ObjectHttpClient},
    data_types::{
        garmin::{
            activity::{GarminActivity, GarminActivityId, UploadResponse},
            gear::{ActivityDescriptionUpdate, ActivityTitleUpdate, Gear, UserProfileLocation},
        },
        workout::Tcx,
    },
    errors::{SyncError, SyncResult},
    logln, logvbln,
    processors::feeds::{FeedIter, SinkActivityFeed},
    util::cursors::{Page, PageCursor},
};

use super::{auth::GarminSession, GARMIN_BASE_URL};

const ACTIVITIES_PER_PAGE: usize = 20;
const UPLOAD_FILENAME: &str = "activity.tcx";

pub struct GarminApi {
    session: GarminSession,
}

impl GarminApi {
    const CC: &'static str = "GarminApi";

    pub fn new(session: GarminSession) -> Self {
        Self { session }
    }

    fn endpoint(&self, path: &[&str]) -> Endpoint {
        Endpoint::of(GARMIN_BASE_URL)
            .path(&["proxy"])
            .path(path)
            .header("nk", "NT")
            .header("cookie", &self.session.to_cookies())
    }

    /// Same as `endpoint`, for POSTs Garmin treats as PUTs.
    fn put_endpoint(&self, path: &[&str]) -> Endpoint {
        self.endpoint(path).header("x-http-method-override", "PUT")
    }

    pub fn activities_page(&self, start: usize, limit: usize) -> SyncResult<Vec<GarminActivity>> {
        logvbln!("Fetching activities {}..{}", start, start + limit);

        ObjectHttpClient::get(
            &self
                .endpoint(&["activitylist-service", "activities", "search", "activities"])
                .query("limit", limit)
                .query("start", start),
        )
    }

    pub fn user_id(&self) -> SyncResult<i64> {
        let location: UserProfileLocation =
            ObjectHttpClient::get(&self.endpoint(&["userprofile-service", "userprofile", "location"]))?;

        Ok(location.user_profile_id)
    }

    /// Gear currently linked to the activity.
    pub fn linked_gear(&self, activity_id: GarminActivityId) -> SyncResult<Vec<Gear>> {
        ObjectHttpClient::get(
            &self
                .endpoint(&["gear-service", "gear", "filterGear"])
                .query("activityId", activity_id),
        )
    }

    /// Gear the user could have used on `date`.
    /// Picks the gear whose make and model is `gear_name` out of what Garmin offers for `date`.
    fn select_gear(available: Vec<Gear>, gear_name: &str, date: NaiveDate) -> SyncResult<Gear> {
        available
            .into_iter()
            .find(|gear| gear.custom_make_model == gear_name)
            .ok_or_else(|| {
                SyncError::upstream(&format!(
                    "Cannot find requested gear '{}' for {}",
                    gear_name, date
                ))
            })
    }

    pub fn available_gear(&self, date: NaiveDate, user_id: i64) -> SyncResult<Vec<Gear>> {
        ObjectHttpClient::get(
            &self
                .endpoint(&["gear-service", "gear", "filterGear"])
                .query("availableGearDate", date)
                .query("userProfilePk", user_id),
        )
    }

    pub fn link_gear(&self, activity_id: GarminActivityId, gear_id: &str) -> SyncResult<()> {
        self.change_gear("link", activity_id, gear_id)
    }

    pub fn unlink_gear(&self, activity_id: GarminActivityId, gear_id: &str) -> SyncResult<()> {
        self.change_gear("unlink", activity_id, gear_id)
    }

    fn change_gear(&self, action: &str, activity_id: GarminActivityId, gear_id: &str) -> SyncResult<()> {
        logvbln!("Gear {} {} on activity {}", action, gear_id, activity_id);

        ObjectHttpClient::post::<(), Value>(
            &self.put_endpoint(&[
                "gear-service",
                "gear",
                action,
                gear_id,
                "activity",
                &activity_id.to_string(),
            ]),
            None,
        )
        .map(|_| ())
    }
}

impl SinkActivityFeed for GarminApi {
    fn activities(&self) -> FeedIter<'_, GarminActivity> {
        Box::new(PageCursor::new(move |page| {
            let items = self.activities_page(page * ACTIVITIES_PER_PAGE, ACTIVITIES_PER_PAGE)?;
            Ok(Page {
                has_more: items.len() == ACTIVITIES_PER_PAGE,
                items,
            })
        }))
    }

    fn upload(&self, tcx: &Tcx) -> SyncResult<GarminActivityId> {
        let response: UploadResponse = ObjectHttpClient::upload(
            &self.endpoint(&["upload-service", "upload", ".tcx"]),
            UPLOAD_FILENAME,
            &tcx.content,
        )?;

        match response.detailed_import_result.successes.as_slice() {
            [success] => Ok(success.activity_id),
            _ => Err(SyncError::upstream(
                "Upload was a success but the response contained no information",
            )),
        }
    }

    fn update_title(&self, activity_id: GarminActivityId, title: &str) -> SyncResult<()> {
        ObjectHttpClient::post::<_, Value>(
            &self.put_endpoint(&["activity-service", "activity", &activity_id.to_string()]),
            Some(&ActivityTitleUpdate {
                activity_id,
                activity_name: title,
            }),
        )
        .map(|_| ())
    }

    fn update_description(&self, activity_id: GarminActivityId, description: &str) -> SyncResult<()> {
        ObjectHttpClient::post::<_, Value>(
            &self.put_endpoint(&["activity-service", "activity", &activity_id.to_string()]),
            Some(&ActivityDescriptionUpdate {
                activity_id,
                description,
            }),
        )
        .map(|_| ())
    }

    fn assign_gear(
        &self,
        activity_id: GarminActivityId,
        activity_date: NaiveDate,
        gear_name: &str,
    ) -> SyncResult<()> {
        let user_id = self.user_id()?;

        let desired = Self::select_gear(
            self.available_gear(activity_date, user_id)?,
            gear_name,
            activity_date,
        )?;

        let mut already_linked = false;
        for gear in self.linked_gear(activity_id)? {
            if gear.gear_id == desired.gear_id {
                already_linked = true;
            } else {
                self.unlink_gear(activity_id, &gear.gear_id)?;
            }
        }

        if !already_linked {
            self.link_gear(activity_id, &desired.gear_id)?;
        }

        logln!("Activity {} rides on '{}'", activity_id, gear_name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gear(model: &str, uuid: &str) -> Gear {
        Gear {
            name: None,
            custom_make_model: model.to_string(),
            gear_id: uuid.to_string(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()
    }

    #[test]
    fn gear_is_selected_by_make_and_model() {
        let available = vec![gear("Road Bike", "a1"), gear("Peloton Bike", "b2")];

        let selected = GarminApi::select_gear(available, "Peloton Bike", date()).unwrap();

        assert_eq!(selected.gear_id, "b2");
    }

    #[test]
    fn unknown_gear_is_an_upstream_failure() {
        let result = GarminApi::select_gear(vec![gear("Road Bike", "a1")], "Peloton Bike", date());

        assert!(matches!(
            result,
            Err(SyncError::Upstream(error)) if error.to_string().contains("Cannot find requested gear 'Peloton Bike'")
        ));
    }
}
